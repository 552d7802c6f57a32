// Prompt construction and model reply parsing

use serde::Deserialize;
use xref_index::CoverageRecord;
use xref_io::AccountSeed;

use crate::error::FetchError;

/// User prompt asking for the official IR analyst coverage list.
pub fn build_prompt(company: &str) -> String {
    let slug: String = company
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    format!(
        r#"Search for "{company} investor relations analyst coverage" and find the official IR webpage that lists their coverage analysts.

Focus specifically on pages with URLs like:
- "{slug}.com/investor/analyst-coverage"
- "{slug}.com/investors/analyst-coverage"
- "{slug}.com/ir/analyst-coverage"
- "ir.{slug}.com/analyst-coverage"
- "investors.{slug}.com/analyst-coverage"

Extract ONLY the analysts directly listed on the company's official IR page.

Return the results in JSON format exactly matching this schema:
{{
  "company": "{company}",
  "coverage_analysts": [
    {{ "firm": "Firm Name", "analyst": "Analyst Name" }}
  ]
}}

If no official IR page with analyst coverage is found, return an empty array for coverage_analysts.
Return only the JSON response, no additional text."#
    )
}

#[derive(Debug, Deserialize)]
struct CoverageReply {
    #[serde(default)]
    coverage_analysts: Vec<ReplyEntry>,
}

#[derive(Debug, Deserialize)]
struct ReplyEntry {
    #[serde(default)]
    firm: Option<String>,
    #[serde(default)]
    analyst: Option<String>,
}

/// Parse the model's reply for `seed` into coverage records.
///
/// The reply's own `company` field is ignored; records carry the seed name
/// and the seed's industry/status.
pub fn parse_reply(seed: &AccountSeed, content: &str) -> Result<Vec<CoverageRecord>, FetchError> {
    let json = strip_code_fence(content);
    let reply: CoverageReply = serde_json::from_str(json).map_err(|e| {
        FetchError::Parse(format!("reply for {} is not coverage JSON: {}", seed.company, e))
    })?;

    let records = reply
        .coverage_analysts
        .into_iter()
        .filter_map(|entry| {
            let analyst = entry.analyst.unwrap_or_default();
            if analyst.trim().is_empty() {
                return None;
            }
            Some(CoverageRecord::new(
                &seed.company,
                &analyst,
                entry.firm.as_deref().unwrap_or(""),
                seed.industry.as_deref(),
                seed.status.as_deref(),
            ))
        })
        .collect();

    Ok(records)
}

/// Models often wrap JSON in a ```json fence despite being asked not to.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
