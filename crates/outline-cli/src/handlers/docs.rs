//! Document command handlers

use super::utils::{payload, read_body, with_spinner, Session};
use crate::cli::{
    DocsAction, DocsArgs, DocsCreateArgs, DocsDeleteArgs, DocsExportArgs, DocsListArgs,
    DocsSearchArgs, DocsUpdateArgs,
};
use crate::error::{Error, ErrorContext, Result};
use crate::logging::timing::Timer;
use crate::output::{
    document_detail, document_rows, search_results, OutputWriter, DOCUMENT_HEADERS,
};
use outline_core::{
    CreateDocumentData, Direction, DocumentListOptions, DocumentSort, ExportFormat,
    OutlineClient, PaginationOptions, SearchOptions, UpdateDocumentData,
};
use serde_json::json;
use tracing::{info, instrument};

/// Handle the docs command
pub async fn handle_docs(args: DocsArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let client = session.client()?;

    match args.action {
        DocsAction::List(args) => list(&client, args, output).await,
        DocsAction::Search(args) => search(&client, args, output).await,
        DocsAction::Info(args) => info(&client, &args.id, output).await,
        DocsAction::Create(args) => create(&client, args, session, output).await,
        DocsAction::Update(args) => update(&client, args, output).await,
        DocsAction::Delete(args) => delete(&client, args, output).await,
        DocsAction::Export(args) => export(&client, args, output).await,
        DocsAction::Archive(args) => {
            let _timer = Timer::new("docs_archive");
            let document = payload(client.documents.archive(&args.id).await?, "documents.archive")?;
            output.success(&format!("✓ Archived \"{}\"", document.title))?;
            if !output.is_human() {
                output.data(&document)?;
            }
            Ok(())
        }
        DocsAction::Unarchive(args) => {
            let _timer = Timer::new("docs_unarchive");
            let document =
                payload(client.documents.unarchive(&args.id).await?, "documents.unarchive")?;
            output.success(&format!("✓ Restored \"{}\"", document.title))?;
            if !output.is_human() {
                output.data(&document)?;
            }
            Ok(())
        }
    }
}

fn list_options(args: &DocsListArgs) -> DocumentListOptions {
    let direction = args.desc.then_some(Direction::Desc);
    DocumentListOptions {
        collection_id: args.collection.clone(),
        sort: match (args.sort, direction) {
            (Some(field), _) => Some(field.into()),
            // Descending without a field means newest edits first
            (None, Some(_)) => Some(DocumentSort::UpdatedAt),
            (None, None) => None,
        },
        direction,
        limit: (!args.all).then_some(args.limit),
        ..Default::default()
    }
}

#[instrument(skip(client, output), fields(all = args.all))]
async fn list(client: &OutlineClient, args: DocsListArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("docs_list");
    let options = list_options(&args);

    let documents = if args.all {
        with_spinner(
            output,
            "Fetching documents...",
            client.documents.iterate(options).collect_all(),
        )
        .await?
    } else {
        let response =
            with_spinner(output, "Fetching documents...", client.documents.list(&options)).await?;
        payload(response, "documents.list")?
    };
    info!(count = documents.len(), "Listed documents");

    if output.is_human() {
        if documents.is_empty() {
            return output.info("No documents found");
        }
        output.table(DOCUMENT_HEADERS, document_rows(&documents))
    } else {
        output.data(&documents)
    }
}

async fn search(client: &OutlineClient, args: DocsSearchArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("docs_search");
    let options = SearchOptions {
        pagination: PaginationOptions {
            limit: Some(args.limit),
            ..Default::default()
        },
        collection_id: args.collection,
        include_archived: args.include_archived.then_some(true),
        include_drafts: args.include_drafts.then_some(true),
        ..Default::default()
    };

    let response = with_spinner(
        output,
        "Searching...",
        client.documents.search(&args.query, &options),
    )
    .await?;
    let results = payload(response, "documents.search")?;
    output.render(&results, |results| search_results(results))
}

async fn info(client: &OutlineClient, id: &str, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("docs_info");
    let document = payload(client.documents.info(id).await?, "documents.info")?;
    output.render(&document, document_detail)
}

async fn create(
    client: &OutlineClient,
    args: DocsCreateArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("docs_create");
    let collection_id = args
        .collection
        .or_else(|| session.file.default_collection.clone())
        .ok_or_else(|| {
            Error::invalid_args(
                "--collection is required (or run 'oln config set default-collection <ID>')",
            )
        })?;

    let data = CreateDocumentData {
        title: args.title,
        text: read_body(args.text, args.file.as_deref())?.unwrap_or_default(),
        collection_id,
        parent_document_id: args.parent,
        publish: args.publish.then_some(true),
        ..Default::default()
    };

    let document = payload(client.documents.create(&data).await?, "documents.create")?;
    output.success(&format!(
        "✓ Created {} \"{}\" ({})",
        if document.is_published() { "document" } else { "draft" },
        document.title,
        document.url_id
    ))?;
    if !output.is_human() {
        output.data(&document)?;
    }
    Ok(())
}

async fn update(client: &OutlineClient, args: DocsUpdateArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("docs_update");
    let text = read_body(args.text, args.file.as_deref())?;
    if args.title.is_none() && text.is_none() && !args.publish {
        return Err(Error::invalid_args(
            "nothing to update: pass --title, --text, --file or --publish",
        ));
    }
    if args.append && text.is_none() {
        return Err(Error::invalid_args("--append needs --text or --file"));
    }

    let data = UpdateDocumentData {
        title: args.title,
        text,
        append: args.append.then_some(true),
        publish: args.publish.then_some(true),
        ..Default::default()
    };

    let document = payload(client.documents.update(&args.id, &data).await?, "documents.update")?;
    output.success(&format!(
        "✓ Updated \"{}\" (revision {})",
        document.title, document.revision
    ))?;
    if !output.is_human() {
        output.data(&document)?;
    }
    Ok(())
}

async fn delete(client: &OutlineClient, args: DocsDeleteArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("docs_delete");
    client.documents.delete(&args.id, args.permanent).await?;

    if args.permanent {
        output.success(&format!("✓ Permanently deleted {}", args.id))?;
    } else {
        output.success(&format!("✓ Moved {} to trash", args.id))?;
    }
    if !output.is_human() {
        output.data(&json!({ "id": args.id, "deleted": true, "permanent": args.permanent }))?;
    }
    Ok(())
}

async fn export(client: &OutlineClient, args: DocsExportArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("docs_export");
    let format: ExportFormat = args.format.into();
    let exported = payload(
        with_spinner(output, "Exporting...", client.documents.export(&args.id, format)).await?,
        "documents.export",
    )?;
    let content = exported.content();

    match args.save_to {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(&format!("✓ Exported {} to {}", args.id, path.display()))
        }
        None if output.is_human() => output.write(content),
        None => output.data(&json!({ "id": args.id, "format": format, "content": content })),
    }
}
