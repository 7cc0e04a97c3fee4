// Text normalization for stat exports.
//
// Exports copied from the stats site carry a citation line, a section banner
// above the real header row, and junk columns left over from merged
// multi-row headers. Strip those before the text reaches the CSV parser.

use crate::catalog::Category;

/// Marker found in the citation line some exports start with.
pub const CITATION_MARKER: &str = "When using SR data";

/// Column artifacts removed wherever they appear.
pub const TRAILING_COLUMN_MARKERS: [&str; 3] = [",-9999", ",-additional", ",Player-additional"];

/// Normalize raw export text for tabular parsing.
///
/// Rules, each skipped when its pattern is absent:
/// 1. drop a leading line containing [`CITATION_MARKER`];
/// 2. drop leading blank lines;
/// 3. drop a leading line containing a category banner word;
/// 4. remove every [`TRAILING_COLUMN_MARKERS`] occurrence.
///
/// The rules are reapplied until the text stops changing, so stacked
/// banners and citations are all removed and a second call is a no-op.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let mut next = strip_leading_lines(&text);
        strip_markers(&mut next);
        // Every pass only removes text, so this terminates.
        if next == text {
            return text;
        }
        text = next;
    }
}

fn is_prefix_junk(line: &str) -> bool {
    line.trim().is_empty()
        || line.contains(CITATION_MARKER)
        || Category::ALL.iter().any(|c| line.contains(c.label()))
}

fn strip_leading_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let start = lines
        .iter()
        .position(|l| !is_prefix_junk(l))
        .unwrap_or(lines.len());
    lines[start..].join("\n")
}

/// Removal can splice a new marker together, so repeat until stable.
fn strip_markers(text: &mut String) {
    loop {
        let before = text.len();
        for marker in TRAILING_COLUMN_MARKERS {
            if text.contains(marker) {
                *text = text.replace(marker, "");
            }
        }
        if text.len() == before {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_category_banner() {
        let raw = "Receiving\nRk,Player,Team\n1,Ja'Marr Chase,CIN\n";
        assert_eq!(normalize(raw), "Rk,Player,Team\n1,Ja'Marr Chase,CIN\n");
    }

    #[test]
    fn drops_citation_blank_lines_and_banner() {
        let raw = "--- When using SR data, please cite us ---\n\n  \nPassing\nRk,Player\n1,Joe Burrow\n";
        assert_eq!(normalize(raw), "Rk,Player\n1,Joe Burrow\n");
    }

    #[test]
    fn citation_only_checked_on_first_line() {
        let raw = "Rk,Player\n1,When using SR data\n";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn banner_only_checked_on_first_remaining_line() {
        let raw = "Rk,Player,Team\n1,Rushing Guy,DET\n";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn banner_match_is_case_sensitive() {
        let raw = "rushing notes\nRk,Player\n";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn strips_trailing_column_markers_anywhere() {
        let raw = "Rk,Player,Team,Player-additional,-9999\n1,A,B,x,-additional\n";
        // ",Player-additional" goes with its comma; "x" stays.
        assert_eq!(normalize(raw), "Rk,Player,Team\n1,A,B,x\n");
    }

    #[test]
    fn spliced_markers_are_removed_too() {
        assert_eq!(normalize("Rk,-99,-999999\n"), "Rk\n");
    }

    #[test]
    fn empty_and_blank_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n\n  \n"), "");
        assert_eq!(normalize("Receiving"), "");
    }

    #[test]
    fn stacked_banners_and_late_citation_are_removed() {
        assert_eq!(
            normalize("Passing\nReceiving\nRk,Player\n1,A\n"),
            "Rk,Player\n1,A\n"
        );
        assert_eq!(
            normalize("Rushing\n--- When using SR data ---\n\nRk,Player\n1,A\n"),
            "Rk,Player\n1,A\n"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "Receiving\nRk,Player,Team,G,Tgt,Rec,Yds,TD\n1,Ja'Marr Chase,CIN,17,175,127,1708,17\n",
            "--- When using SR data ---\n\nRushing\n\nRk,Player,-9999\n1,Saquon Barkley,x\n",
            "Rk,Player\n\n1,A\n",
            "",
            "Passing\n",
            "Passing\nReceiving\nRk,Player\n1,A\n",
            "Rushing\n--- When using SR data ---\nRk,Player\n1,A\n",
            "Receiving\n,-9999\nRk,Player\n1,A\n",
        ];
        for raw in inputs {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }
}
