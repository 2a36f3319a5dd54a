use snippet::action::Visibility;

use crate::stage::StageResults;

/// How show-stage listings are labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingStyle {
    /// Info string of the listing fence.
    pub language: String,
    /// Line comment prefix used for the `<comment> <path>` header.
    pub comment: String,
}

impl Default for ListingStyle {
    fn default() -> Self {
        ListingStyle {
            language: "c".to_string(),
            comment: "//".to_string(),
        }
    }
}

/// Render one snippet's results as Markdown.
///
/// Listings come first, then build output, then run output. The three groups
/// are separated by a newline even when one of them is empty. Build output is
/// dropped entirely for silent snippets.
pub fn render(results: &StageResults, visibility: Visibility, style: &ListingStyle) -> String {
    let shows: Vec<String> = results
        .show
        .iter()
        .map(|listing| {
            format!(
                "```{}\n{} {}\n{}```\n",
                style.language, style.comment, listing.path, listing.content
            )
        })
        .collect();

    let builds: Vec<String> = match visibility {
        Visibility::Silent => Vec::new(),
        Visibility::Echo => results
            .build
            .records
            .iter()
            .flat_map(|record| {
                std::iter::once(record.command.as_str()).chain(record.diagnostic.as_deref())
            })
            .map(|text| format!("```\n{}\n```\n", text))
            .collect(),
    };

    let runs: Vec<String> = results
        .run
        .iter()
        .map(|capture| match visibility {
            Visibility::Echo => format!("```\n$ {}\n{}```\n", capture.command, capture.stdout),
            Visibility::Silent => format!("```\n{}```\n", capture.stdout),
        })
        .collect();

    [shows.join("\n"), builds.join("\n"), runs.join("\n")].join("\n")
}
