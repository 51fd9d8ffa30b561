//! `halkit`: build HAL documents from the command line.
//!
//! Provides two subcommands:
//!
//! - **`render`**: build a document from a JSON description and print it.
//! - **`check`**: run the construction-time checks only.
//!
//! A description is a JSON object with three optional keys:
//!
//! ```json
//! {
//!   "data": { "currentlyProcessing": 14 },
//!   "links": [{ "rel": "next", "href": "/orders?page=2" }],
//!   "embedded": { "orders": { "data": [{ "total": 30 }] } }
//! }
//! ```
//!
//! All subcommands read JSON from a file path or from stdin (`-`).

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use halkit::{Document, Embedded, Resource, TypeError};
use serde_json::Value;

/// halkit: HAL document CLI
///
/// Render and check HAL documents described in JSON.
#[derive(Parser)]
#[command(name = "halkit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a HAL document from a description and print it as JSON.
    ///
    /// Examples:
    ///   halkit render order.json --self /orders/7
    ///   echo '{"data":[1,2]}' | halkit render - --embedded
    Render {
        /// Path to a JSON description, or `-` for stdin.
        file: PathBuf,

        /// Href of the document's `self` link.
        #[arg(long = "self", value_name = "URL", env = "HALKIT_SELF", required_unless_present = "embedded")]
        self_href: Option<String>,

        /// Build an embedded resource: no `self` link, `data` may be an array.
        #[arg(long)]
        embedded: bool,

        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },

    /// Check a description without printing the document.
    ///
    /// Exits 0 and prints `valid` when the document can be built, 1 otherwise.
    Check {
        /// Path to a JSON description, or `-` for stdin.
        file: PathBuf,

        /// Check as an embedded resource.
        #[arg(long)]
        embedded: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            file,
            self_href,
            embedded,
            pretty,
        } => {
            let description = parse_description(&read_input(&file));
            let resource = build(&description, self_href.as_deref(), embedded)
                .unwrap_or_else(|e| invalid(&e));
            let mapping = resource.to_mapping();
            let text = if pretty {
                serde_json::to_string_pretty(&mapping).unwrap_or_else(|e| fatal(&e.to_string()))
            } else {
                resource.to_json()
            };
            println!("{text}");
        }

        Command::Check { file, embedded } => {
            let description = parse_description(&read_input(&file));
            // Any fixed href will do: only the checks matter here.
            match build(&description, Some("/"), embedded) {
                Ok(_) => println!("valid"),
                Err(e) => invalid(&e),
            }
        }
    }
}

/// Build a [`Document`], or an [`Embedded`] resource when `embedded` is set.
fn build(
    description: &Value,
    self_href: Option<&str>,
    embedded: bool,
) -> Result<Box<dyn Resource>, TypeError> {
    if embedded {
        return Ok(Box::new(Embedded::from_value(description)?));
    }
    let href = self_href.unwrap_or("/");
    Ok(Box::new(Document::from_value(href, description)?))
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &PathBuf) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            fatal(&format!("failed to read {}: {}", path.display(), e))
        })
    }
}

/// Parse the input as JSON. An empty input is an empty description.
fn parse_description(json: &str) -> Value {
    if json.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(json)
        .unwrap_or_else(|e| fatal(&format!("failed to parse input as JSON: {}", e)))
}

/// Report a document that cannot be built and exit with code 1.
fn invalid(e: &TypeError) -> ! {
    eprintln!("error: {}", e);
    process::exit(1);
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("halkit: {}", msg);
    process::exit(2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_document_with_fixed_self_link() {
        let description = json!({
            "data": { "currentlyProcessing": 14 },
            "links": [{ "rel": "next", "href": "/orders?page=2" }]
        });
        let doc = build(&description, Some("/orders"), false).unwrap();
        assert_eq!(
            doc.to_json(),
            r#"{"currentlyProcessing":14,"_links":{"next":{"href":"/orders?page=2"},"self":{"href":"/orders"}}}"#
        );
    }

    #[test]
    fn renders_embedded_list() {
        let doc = build(&json!({ "data": [1, 2] }), None, true).unwrap();
        assert_eq!(doc.to_json(), "[1,2]");
    }

    #[test]
    fn rejects_bare_link() {
        let err = build(&json!({ "links": { "rel": "a", "href": "/a" } }), Some("/"), false)
            .err()
            .unwrap();
        assert!(matches!(err, TypeError::NotALinkCollection(_)));
    }

    #[test]
    fn empty_input_is_empty_description() {
        assert_eq!(parse_description("  \n"), Value::Null);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
