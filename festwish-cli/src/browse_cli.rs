//! Catalog browsing commands

use anyhow::{Context, Result};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use festwish_core::catalog::{Catalogs, FestivalFilter, RelationshipCategory};

/// Table row for festival listings
#[derive(Tabled)]
struct FestivalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Culture")]
    culture: String,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Table row for relationship listings
#[derive(Tabled)]
struct RelationshipRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "Category")]
    category: String,
}

fn render<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

pub fn list_festivals(
    catalogs: &Catalogs,
    culture: Option<&str>,
    month: Option<&str>,
    search: Option<&str>,
    json_output: bool,
) -> Result<()> {
    let results = catalogs.festivals.filter(&FestivalFilter {
        query: search,
        culture,
        month,
    });

    if json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No festivals found.");
        return Ok(());
    }

    let rows: Vec<FestivalRow> = results
        .iter()
        .map(|f| FestivalRow {
            id: f.id.clone(),
            name: f.name.clone(),
            culture: f.religion_culture.clone().unwrap_or_default(),
            month: f.typical_month.clone().unwrap_or_default(),
            description: truncate(f.short_description(), 50),
        })
        .collect();

    println!("Found {} festival(s):\n", rows.len());
    println!("{}", render(&rows));
    Ok(())
}

pub fn show_festival(catalogs: &Catalogs, id_or_slug: &str, json_output: bool) -> Result<()> {
    let festival = catalogs
        .festivals
        .find(id_or_slug)
        .with_context(|| format!("Festival '{id_or_slug}' not found in catalog"))?;

    let quotes = catalogs.quotes.quotes_for(&festival.slug);

    // Relationships with templates, and the tones usable with `content --tone`
    let greetings: Vec<(&str, Vec<&str>)> = catalogs
        .relationships
        .list_all()
        .into_iter()
        .filter(|r| catalogs.messages.has_messages(&festival.slug, &r.name))
        .map(|r| {
            (
                r.id.as_str(),
                catalogs.messages.available_tones(&festival.slug, &r.name),
            )
        })
        .collect();

    if json_output {
        let greetings: Vec<serde_json::Value> = greetings
            .iter()
            .map(|(relationship_id, tones)| {
                serde_json::json!({ "relationship_id": relationship_id, "tones": tones })
            })
            .collect();
        let output = serde_json::json!({
            "festival": festival,
            "quotes": quotes,
            "greetings": greetings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Festival: {} ({})", festival.name, festival.slug);
    println!("ID:       {}", festival.id);
    if let Some(culture) = &festival.religion_culture {
        println!("Culture:  {culture}");
    }
    if let Some(month) = &festival.typical_month {
        println!("Month:    {month}");
    }
    if let Some(image) = &festival.image {
        println!("Image:    {}", image.url);
    }

    if !festival.description.is_empty() {
        println!("\n{}", festival.description);
    }

    for (label, text) in [
        ("Story", &festival.story_history),
        ("Significance", &festival.cultural_significance),
        ("Traditions", &festival.traditions),
    ] {
        if let Some(text) = text {
            println!("\n{label}:\n  {text}");
        }
    }

    if !greetings.is_empty() {
        println!("\nGreetings:");
        for (relationship_id, tones) in &greetings {
            let tones: Vec<&str> = tones
                .iter()
                .map(|t| if t.is_empty() { "(untoned)" } else { *t })
                .collect();
            println!("  {relationship_id}: {}", tones.join(", "));
        }
    }

    if !catalogs.quotes.has_quotes(&festival.slug) {
        println!("\nQuotes: (none)");
        return Ok(());
    }

    println!("\nQuotes: {}", quotes.len());
    for quote in quotes {
        match &quote.author {
            Some(author) => println!("  \"{}\" - {}", quote.text, author),
            None => println!("  \"{}\"", quote.text),
        }
    }

    Ok(())
}

pub fn list_relationships(
    catalogs: &Catalogs,
    category: Option<RelationshipCategory>,
    json_output: bool,
) -> Result<()> {
    let results = catalogs.relationships.list_by_category(category);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No relationships found.");
        return Ok(());
    }

    let rows: Vec<RelationshipRow> = results
        .iter()
        .map(|r| RelationshipRow {
            id: r.id.clone(),
            display_name: r.display_name.clone(),
            category: r.category.to_string(),
        })
        .collect();

    println!("{}", render(&rows));
    Ok(())
}

pub fn list_categories(catalogs: &Catalogs) -> Result<()> {
    for category in catalogs.relationships.categories() {
        println!("{category}");
    }
    Ok(())
}

pub fn list_cultures(catalogs: &Catalogs) -> Result<()> {
    for culture in catalogs.festivals.cultures() {
        println!("{culture}");
    }
    Ok(())
}
