//! Kernel-side receipt of the cell-removal payload.

use crate::KernelError;
use nemo_core::{CellId, CELL_REMOVAL_EVENT};

/// Returns true if an execute request carries a cell-removal payload.
pub fn is_cell_removal(code: &str) -> bool {
    code.contains(CELL_REMOVAL_EVENT)
}

/// Parses `cell_removal_event, [<id>, ...]` into the surviving cell IDs.
pub fn parse_cell_removal(code: &str) -> Result<Vec<CellId>, KernelError> {
    let (_, list) = code
        .split_once(',')
        .ok_or_else(|| KernelError::MalformedRemoval("missing cell list".to_string()))?;
    Ok(serde_json::from_str(list.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nemo_core::cell_removal_code;

    #[test]
    fn test_parse_payload() {
        let ids = parse_cell_removal(r#"cell_removal_event, ["a","c"]"#).unwrap();
        assert_eq!(ids, vec![CellId::from("a"), CellId::from("c")]);
    }

    #[test]
    fn test_parse_what_the_frontend_sends() {
        let surviving = vec![CellId::from("4f1c"), CellId::from("x,y")];
        let code = cell_removal_code(&surviving);
        assert!(is_cell_removal(&code));
        assert_eq!(parse_cell_removal(&code).unwrap(), surviving);
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_cell_removal("cell_removal_event, []").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            parse_cell_removal("cell_removal_event"),
            Err(KernelError::MalformedRemoval(_))
        ));
        assert!(matches!(
            parse_cell_removal("cell_removal_event, [a]"),
            Err(KernelError::Json(_))
        ));
    }

    #[test]
    fn test_rules_are_not_removals() {
        assert!(!is_cell_removal("p(1). @output p."));
    }
}
