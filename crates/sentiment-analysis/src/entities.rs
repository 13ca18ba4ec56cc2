use crate::scorer::tokenize;

const COMPANY_SUFFIXES: &[&str] = &["Inc", "Corp", "Ltd", "LLC", "Limited"];

/// Company names of the form `"<Word> <Suffix>"`, unique, in first-seen order.
///
/// Suffix matching is case-sensitive, so "limited supply" is not a company.
pub fn extract_entities(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut entities: Vec<String> = Vec::new();

    for pair in tokens.windows(2) {
        let (name, suffix) = (pair[0], pair[1]);
        if !COMPANY_SUFFIXES.contains(&suffix) {
            continue;
        }
        let entity = format!("{} {}", name, suffix);
        if !entities.contains(&entity) {
            entities.push(entity);
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_company_names() {
        let entities = extract_entities(
            "Engro Corp and Lucky Cement Limited rallied; Engro Corp led volumes while Apple Inc. lagged",
        );
        assert_eq!(entities, vec!["Engro Corp", "Cement Limited", "Apple Inc"]);
    }

    #[test]
    fn test_suffix_without_predecessor_is_ignored() {
        assert!(extract_entities("Ltd shares rose").is_empty());
        assert!(extract_entities("supply is limited").is_empty());
        assert!(extract_entities("").is_empty());
    }
}
