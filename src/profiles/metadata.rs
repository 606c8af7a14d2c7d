//! MG-009: Alembic aggregation module.
//!
//! Imports `metadata` from every generated model module, in the order given,
//! so `env.py` can hand the whole list to Alembic as `target_metadata`.

use super::HEADER;

/// Render the aggregation module for `package.<module>` imports.
pub fn render(package: &str, modules: &[String]) -> String {
    let mut lines = vec![HEADER.to_string()];

    for module in modules {
        lines.push(format!(
            "from {}.{} import metadata as {}_metadata",
            package, module, module
        ));
    }

    lines.push(String::new());
    if modules.is_empty() {
        lines.push("metadata = []".to_string());
    } else {
        lines.push("metadata = [".to_string());
        for module in modules {
            lines.push(format!("    {}_metadata,", module));
        }
        lines.push("]".to_string());
    }

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mg009_given_order() {
        let out = render("models", &["orders".to_string(), "items".to_string()]);
        let expected = "\
# Generated by modelgen. Do not edit by hand.
from models.orders import metadata as orders_metadata
from models.items import metadata as items_metadata

metadata = [
    orders_metadata,
    items_metadata,
]
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_mg009_empty() {
        let out = render("models", &[]);
        assert!(out.ends_with("\nmetadata = []\n"));
        assert!(!out.contains("import"));
    }

    #[test]
    fn test_mg009_custom_package() {
        let out = render("app_models", &["shop".to_string()]);
        assert!(out.contains("from app_models.shop import metadata as shop_metadata\n"));
    }
}
