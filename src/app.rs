//! The two user operations
//!
//! Thin orchestration over the clients and caches: resolve a window and
//! list matching commands, or walk one command's invocations and print
//! every plugin's output, pulling mirrored files through the object
//! cache. All awaits are sequential; a single invocation of the tool
//! never mutates the same cache entry twice.

use thiserror::Error;

use crate::cache::{ObjectCache, ObjectCacheError};
use crate::data::{
    CommandServiceClient, CommandServiceError, InstanceDirectory, Inventory, InventoryError,
    ObjectStore, ObjectStoreError,
};
use crate::render;
use crate::timewindow::{self, TimeWindowError};

/// Errors surfaced by the user operations
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Window(#[from] TimeWindowError),

    #[error(transparent)]
    CommandService(#[from] CommandServiceError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),

    #[error(transparent)]
    ObjectCache(#[from] ObjectCacheError),
}

/// Lists commands issued inside the requested window, one row each.
pub async fn list_commands(
    service: &CommandServiceClient,
    after: Option<&str>,
    before: Option<&str>,
    delta: &str,
) -> Result<(), AppError> {
    let filters = timewindow::resolve(after, before, delta)?;
    let commands = service.list_commands(&filters).await?;
    for command in &commands {
        render::print_command_row(command);
    }
    Ok(())
}

/// Shows per-instance, per-plugin output for one command.
///
/// Plugins that mirrored their output to the object store get each file
/// under their prefix printed via the cache; the rest fall back to the
/// inline output the service returned.
pub async fn show_command<I, S>(
    service: &CommandServiceClient,
    directory: &InstanceDirectory<I>,
    cache: &ObjectCache<S>,
    command_id: &str,
) -> Result<(), AppError>
where
    I: Inventory,
    S: ObjectStore,
{
    let invocations = service.list_invocations(command_id).await?;
    let instances = directory.get().await?;

    for invocation in &invocations {
        render::print_instance_header(invocation, instances.get(&invocation.instance_id));

        for plugin in &invocation.plugins {
            match &plugin.output_bucket {
                Some(bucket) => {
                    let prefix = plugin.output_prefix.as_deref().unwrap_or_default();
                    let files = cache.store().list(bucket, prefix).await?;
                    for file in files {
                        render::print_source_header(&file);
                        println!("{}", cache.fetch(&file).await?);
                    }
                }
                None => {
                    render::print_source_header("No object-store output");
                    println!("{}", plugin.output);
                }
            }
        }
    }
    Ok(())
}
