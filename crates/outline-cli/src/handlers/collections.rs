//! Collection command handlers

use super::utils::{payload, with_spinner, Session};
use crate::cli::{CollectionsAction, CollectionsArgs, CollectionsCreateArgs, CollectionsListArgs};
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{
    collection_detail, collection_rows, collection_tree, OutputWriter, COLLECTION_HEADERS,
};
use outline_core::{
    CollectionExportFormat, CreateCollectionData, OutlineClient, PaginationOptions, Permission,
};
use serde_json::json;

/// Handle the collections command
pub async fn handle_collections(
    args: CollectionsArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    let client = session.client()?;

    match args.action {
        CollectionsAction::List(args) => list(&client, args, output).await,
        CollectionsAction::Info(args) => {
            let _timer = Timer::new("collections_info");
            let collection = payload(client.collections.info(&args.id).await?, "collections.info")?;
            output.render(&collection, collection_detail)
        }
        CollectionsAction::Documents(args) => {
            let _timer = Timer::new("collections_documents");
            let response = with_spinner(
                output,
                "Fetching document tree...",
                client.collections.documents(&args.id, &PaginationOptions::default()),
            )
            .await?;
            let tree = payload(response, "collections.documents")?;
            output.render(&tree, |tree| collection_tree(tree))
        }
        CollectionsAction::Create(args) => create(&client, args, output).await,
        CollectionsAction::Delete(args) => {
            let _timer = Timer::new("collections_delete");
            client.collections.delete(&args.id).await?;
            output.success(&format!("✓ Deleted collection {}", args.id))?;
            if !output.is_human() {
                output.data(&json!({ "id": args.id, "deleted": true }))?;
            }
            Ok(())
        }
        CollectionsAction::Export(args) => {
            let _timer = Timer::new("collections_export");
            let format: CollectionExportFormat = args.format.into();
            let operation = payload(
                client.collections.export(&args.id, format).await?,
                "collections.export",
            )?;
            output.success("✓ Export started; Outline will notify you when the file is ready")?;
            if !output.is_human() {
                output.data(&operation)?;
            }
            Ok(())
        }
    }
}

async fn list(
    client: &OutlineClient,
    args: CollectionsListArgs,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("collections_list");

    let collections = if args.all {
        with_spinner(
            output,
            "Fetching collections...",
            client.collections.iterate().collect_all(),
        )
        .await?
    } else {
        let options = PaginationOptions {
            limit: Some(args.limit),
            ..Default::default()
        };
        payload(client.collections.list(&options).await?, "collections.list")?
    };

    if output.is_human() {
        if collections.is_empty() {
            return output.info("No collections found");
        }
        output.table(COLLECTION_HEADERS, collection_rows(&collections))
    } else {
        output.data(&collections)
    }
}

fn create_data(args: CollectionsCreateArgs) -> Result<CreateCollectionData> {
    if let Some(color) = &args.color {
        let hex = color.strip_prefix('#').unwrap_or(color);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_args(format!(
                "color must be a hex value like #4E5C6E, got '{}'",
                color
            )));
        }
    }

    Ok(CreateCollectionData {
        name: args.name,
        description: args.description,
        color: args
            .color
            .map(|c| if c.starts_with('#') { c } else { format!("#{}", c) }),
        // Private collections carry no team-wide permission
        permission: (!args.private).then_some(Permission::ReadWrite),
        ..Default::default()
    })
}

async fn create(
    client: &OutlineClient,
    args: CollectionsCreateArgs,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("collections_create");
    let data = create_data(args)?;
    let collection = payload(client.collections.create(&data).await?, "collections.create")?;

    output.success(&format!("✓ Created collection \"{}\" ({})", collection.name, collection.id))?;
    if !output.is_human() {
        output.data(&collection)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(color: Option<&str>, private: bool) -> CollectionsCreateArgs {
        CollectionsCreateArgs {
            name: "Engineering".to_string(),
            description: None,
            color: color.map(str::to_string),
            private,
        }
    }

    #[test]
    fn test_create_data_permission() {
        let data = create_data(args(None, false)).unwrap();
        assert_eq!(data.permission, Some(Permission::ReadWrite));

        let data = create_data(args(None, true)).unwrap();
        assert_eq!(data.permission, None);
    }

    #[test]
    fn test_create_data_color() {
        let data = create_data(args(Some("4e5c6e"), false)).unwrap();
        assert_eq!(data.color.as_deref(), Some("#4e5c6e"));

        assert!(create_data(args(Some("#12345"), false)).is_err());
        assert!(create_data(args(Some("#zzzzzz"), false)).is_err());
    }
}
