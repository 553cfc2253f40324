//! `.pages` Line Parser
//!
//! awesome-pages形式の`.pages`から、このツールが必要とする2種類の情報だけを抽出する。
//!
//! - サブフォルダ側: `title: カテゴリ｜年月` からカテゴリ名
//! - ルート側: `nav:` 直下の `- カテゴリ:` 行からカテゴリ順
//!
//! それ以外のキーや行はすべて無視する（未知のキーに寛容）。

const TITLE_KEY: &str = "title:";
const BOM: char = '\u{feff}';

fn normalize_line(raw: &str) -> &str {
    raw.trim_start_matches(BOM).trim()
}

/// `title:` 行からカテゴリ名を抽出する
///
/// 最初の `title:` 行だけを見る。値の前後の引用符を外し、`separator` より前を
/// カテゴリとする。空文字列は `None`。
pub fn extract_category(content: &str, separator: &str) -> Option<String> {
    let line = content
        .lines()
        .map(normalize_line)
        .find(|line| line.starts_with(TITLE_KEY))?;

    let title = line[TITLE_KEY.len()..]
        .trim()
        .trim_matches('"')
        .trim_matches('\'');

    let category = if separator.is_empty() {
        title
    } else {
        title
            .split_once(separator)
            .map_or(title, |(category, _)| category)
    };

    let category = category.trim();
    (!category.is_empty()).then(|| category.to_string())
}

/// ルート `.pages` のグループ見出し (`- カテゴリ:`) を出現順に返す
pub fn parse_group_headers(content: &str) -> Vec<String> {
    content
        .lines()
        .map(normalize_line)
        .filter_map(|line| line.strip_prefix("- "))
        .filter_map(|entry| entry.strip_suffix(':'))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: &str = "｜";

    #[test]
    fn test_title_with_separator() {
        assert_eq!(
            extract_category("title: News｜2024-01\n", SEP),
            Some("News".to_string())
        );
    }

    #[test]
    fn test_title_quoted() {
        assert_eq!(
            extract_category("title: \"勉強会｜2024-02\"", SEP),
            Some("勉強会".to_string())
        );
        assert_eq!(
            extract_category("title: 'Blog｜2023'", SEP),
            Some("Blog".to_string())
        );
    }

    #[test]
    fn test_title_without_separator() {
        assert_eq!(
            extract_category("title: Reference", SEP),
            Some("Reference".to_string())
        );
    }

    #[test]
    fn test_title_after_other_keys_and_bom() {
        let content = "\u{feff}nav:\n  - index.md\n  title:  News ｜ 2024-03  \n";
        assert_eq!(extract_category(content, SEP), Some("News".to_string()));
    }

    #[test]
    fn test_title_empty_or_missing() {
        assert_eq!(extract_category("title:", SEP), None);
        assert_eq!(extract_category("title: \"\"", SEP), None);
        assert_eq!(extract_category("title: ｜2024-01", SEP), None);
        assert_eq!(extract_category("nav:\n  - a.md\n", SEP), None);
        assert_eq!(extract_category("", SEP), None);
    }

    #[test]
    fn test_only_first_title_counts() {
        let content = "title: ''\ntitle: Later｜2024\n";
        assert_eq!(extract_category(content, SEP), None);
    }

    #[test]
    fn test_title_key_must_lead_line() {
        assert_eq!(extract_category("subtitle: News｜2024", SEP), None);
        assert_eq!(extract_category("# title: News｜2024", SEP), None);
    }

    #[test]
    fn test_custom_separator() {
        assert_eq!(
            extract_category("title: News | 2024", "|"),
            Some("News".to_string())
        );
        assert_eq!(
            extract_category("title: News | 2024", ""),
            Some("News | 2024".to_string())
        );
    }

    #[test]
    fn test_group_headers() {
        let content = "\
nav:
  - index.md
  - News:
      - path: news-2024-02
      - path: news-2024-01
  - 勉強会:
      - path: study-2024-01
";
        assert_eq!(parse_group_headers(content), vec!["News", "勉強会"]);
    }

    #[test]
    fn test_group_headers_rejected_shapes() {
        let content = "\
nav:
  - index.md
  -Bad:
  - :
  -  Spaced  :
  - path: x:
  - Title: value
hide: true
";
        assert_eq!(parse_group_headers(content), vec!["Spaced", "path: x"]);
    }

    #[test]
    fn test_group_headers_empty() {
        assert!(parse_group_headers("").is_empty());
        assert!(parse_group_headers("title: Only\n").is_empty());
    }
}
