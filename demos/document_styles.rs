//! Walkthrough of the three stores
//!
//! This example shows:
//! - Relations under different cardinalities, inversion and composition
//! - Forest sprouting, grafting, level queries and structural union
//! - Attribute inheritance in an arboretum
//!
//! Run with `RUST_LOG=debug` to see graft and prune events.

use encyclopedia::{Arboretum, Encyclopedia, EncyclopediaConfig, Forest, Relation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("=== Encyclopedia Demo ===\n");

    // 1. Relations
    println!("1. Relations");
    let config = EncyclopediaConfig::from_json(r#"{"relation": {"cardinality": "M:1"}}"#)?;
    let mut authors = Relation::with_config(config.relation);
    authors.set("Dune", "Herbert")?;
    authors.set("Emma", "Austen")?;
    authors.set("Persuasion", "Austen")?;
    print!("{}", authors);

    let books = !&authors;
    print!("{}", books);

    let mut born = Relation::function();
    born.set("Herbert", 1920)?;
    born.set("Austen", 1775)?;
    let written_by_born = (&born * &authors)?;
    println!("   Emma's author was born in {:?}\n", written_by_born.get_one(&"Emma"));

    // 2. Forests
    println!("2. Forests");
    let mut outline = Forest::new();
    outline.set("Document", "Section 1")?;
    outline.set("Document", "Section 2")?;
    outline.set("Section 1", "Section 1.1")?;

    let mut boilerplate = Forest::new();
    boilerplate.set("Notes", "Footnote")?;
    outline.graft(&"Section 2", &boilerplate)?;
    print!("{}", outline);
    println!("   height of Footnote: {}", outline.height(&"Footnote")?);

    let doubled = (&outline + &outline.reissue())?;
    println!("   union with a fresh copy keeps {} tree(s)\n", doubled.tree_count());

    // 3. Arboreta
    println!("3. Arboreta");
    let mut styled: Arboretum<&str, &str> = Arboretum::new();
    styled.set("Document", "Section 1")?;
    styled.set("Section 1", "Section 1.1")?;
    styled.set_attribute(&"Section 1", "font", "Helvetica")?;
    styled.set("Document", "Section 2")?;
    styled.set("Section 1.1", "Section 1.1.1")?;
    print!("{}", styled);
    println!(
        "   Section 1.1.1 font: {:?}, Section 2 font: {:?}",
        styled.get_attribute(&"Section 1.1.1", "font"),
        styled.get_attribute(&"Section 2", "font")
    );
    println!("   {} keys, {} nodes", styled.len(), styled.node_count());

    println!("\n=== Demo Complete ===");
    Ok(())
}
