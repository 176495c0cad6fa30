//! Content resolution and wish preview commands

use anyhow::Result;
use std::sync::Arc;

use festwish_core::feed::ContentFeed;
use festwish_core::resolver::{ContentBundle, ContentRequest, ContentResolver};
use festwish_core::wish::{WishDraft, WishPreview};

fn print_bundle(bundle: &ContentBundle) {
    match &bundle.message {
        Some(message) if message.tone.is_empty() => println!("Message: {}", message.text),
        Some(message) => println!("Message: {} [{}]", message.text, message.tone),
        None => println!("Message: (none)"),
    }
    match &bundle.quote {
        Some(quote) => match &quote.author {
            Some(author) => println!("Quote:   \"{}\" - {}", quote.text, author),
            None => println!("Quote:   \"{}\"", quote.text),
        },
        None => println!("Quote:   (none)"),
    }
    match &bundle.image {
        Some(image) => println!("Image:   {}", image.url),
        None => println!("Image:   (none)"),
    }
}

/// Resolve `draws` bundles in sequence; `--json` always prints an array
pub async fn execute_content(
    resolver: Arc<dyn ContentResolver>,
    festival_id: &str,
    relationship_id: Option<&str>,
    tone: Option<&str>,
    draws: u32,
    json_output: bool,
) -> Result<()> {
    let mut request = ContentRequest::new(festival_id);
    request.relationship_id = relationship_id.map(str::to_string);
    request.tone = tone.map(str::to_string);

    let feed = ContentFeed::new(resolver, request);

    let mut bundles = Vec::new();
    for _ in 0..draws.max(1) {
        if let Some(bundle) = feed.refresh().await? {
            bundles.push(bundle);
        }
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&bundles)?);
        return Ok(());
    }

    for (i, bundle) in bundles.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_bundle(bundle);
    }
    Ok(())
}

fn print_preview(preview: &WishPreview) {
    println!("{} wishes for your {}", preview.festival_name, preview.relationship_name);
    if let Some(recipient) = &preview.recipient_name {
        println!("To: {recipient}");
    }
    println!();
    println!(
        "{}",
        preview
            .message_text
            .as_deref()
            .unwrap_or("(no message available, add one with --message)")
    );
    if let Some(quote) = &preview.quote_text {
        match &preview.quote_author {
            Some(author) => println!("\n\"{quote}\" - {author}"),
            None => println!("\n\"{quote}\""),
        }
    }
    if let Some(url) = &preview.image_url {
        println!("\nCard image: {url}");
    }
}

pub async fn execute_preview(
    resolver: &dyn ContentResolver,
    festival_id: String,
    relationship_id: String,
    recipient_name: Option<String>,
    custom_message: Option<String>,
    json_output: bool,
) -> Result<()> {
    let draft = WishDraft {
        festival_id,
        relationship_id,
        recipient_name,
        custom_message,
    };

    let preview = resolver.preview(&draft).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        print_preview(&preview);
    }
    Ok(())
}
