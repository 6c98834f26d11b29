//! Filter predicate tests over the classic bookstore document.

use quson::{path, Node};

const STORE: &[u8] = br#"{
    "store": {
        "book": [
            {"category": "reference", "author": "Nigel Rees", "title": "Sayings of the Century", "price": 8.95},
            {"category": "fiction", "author": "Evelyn Waugh", "title": "Sword of Honour", "price": 12.99},
            {"category": "fiction", "author": "Herman Melville", "title": "Moby Dick", "isbn": "0-553-21311-3", "price": 8.99},
            {"category": "fiction", "author": "J. R. R. Tolkien", "title": "The Lord of the Rings", "isbn": "0-395-19395-8", "price": 22.99}
        ],
        "bicycle": {"color": "red", "price": 19.95},
        "ratings": [3, 8.5, 9.25]
    },
    "expensive": 10
}"#;

fn titles(expr: &str) -> Vec<String> {
    path(STORE, expr)
        .expect(expr)
        .iter()
        .map(Node::must_string)
        .collect()
}

fn prices(expr: &str) -> Vec<f64> {
    path(STORE, expr)
        .expect(expr)
        .iter()
        .map(Node::must_numeric)
        .collect()
}

#[cfg(test)]
mod comparison_tests {
    use super::*;

    #[test]
    fn numeric_comparisons_select_matching_children() {
        assert_eq!(
            titles("$.store.book[?(@.price < 10)].title"),
            vec!["Sayings of the Century", "Moby Dick"]
        );
        assert_eq!(
            titles("$.store.book[?(@.price >= 12.99)].title"),
            vec!["Sword of Honour", "The Lord of the Rings"]
        );
        assert!(titles("$.store.book[?(@.price > 100)].title").is_empty());
    }

    #[test]
    fn string_equality_and_inequality() {
        assert_eq!(
            titles("$.store.book[?(@.category == 'fiction')].title"),
            vec!["Sword of Honour", "Moby Dick", "The Lord of the Rings"]
        );
        assert_eq!(
            titles("$.store.book[?(@.category != 'fiction')].title"),
            vec!["Sayings of the Century"]
        );
    }

    #[test]
    fn root_references_resolve_against_the_document() {
        assert_eq!(
            prices("$.store.book[?(@.price < $.expensive)].price"),
            vec![8.95, 8.99]
        );
    }

    #[test]
    fn kind_mismatches_abort_the_query() {
        // `category` is a string; ordering it against a number is an error,
        // and the error surfaces instead of silently excluding the book.
        assert!(path(STORE, "$.store.book[?(@.category > 5)].title").is_err());
    }
}

#[cfg(test)]
mod boolean_logic_tests {
    use super::*;

    #[test]
    fn conjunction_and_disjunction() {
        assert_eq!(
            titles("$.store.book[?(@.category == 'fiction' && @.price < 10)].title"),
            vec!["Moby Dick"]
        );
        assert_eq!(
            titles("$.store.book[?(@.category == 'reference' || @.price > 20)].title"),
            vec!["Sayings of the Century", "The Lord of the Rings"]
        );
    }

    #[test]
    fn parentheses_group_subexpressions() {
        assert_eq!(
            titles(
                "$.store.book[?(@.price < 10 && (@.category == 'fiction' || @.category == 'reference'))].title"
            ),
            vec!["Sayings of the Century", "Moby Dick"]
        );
    }

    #[test]
    fn existence_checks_use_truthiness() {
        assert_eq!(
            prices("$.store.book[?(@.isbn)].price"),
            vec![8.99, 22.99]
        );
    }
}

#[cfg(test)]
mod arithmetic_and_function_tests {
    use super::*;

    #[test]
    fn arithmetic_operators_compute_before_comparison() {
        assert_eq!(
            prices("$.store.book[?(@.price * 2 < 20)].price"),
            vec![8.95, 8.99]
        );
        assert_eq!(
            prices("$.store.book[?(@.price * 4 == 35.8)].price"),
            vec![8.95]
        );
    }

    #[test]
    fn length_function_applies_to_strings_and_containers() {
        assert_eq!(
            titles("$.store.book[?(length(@.title) == 9)].title"),
            vec!["Moby Dick"]
        );
    }

    #[test]
    fn bare_current_node_compares_directly() {
        let result = path(STORE, "$.store.ratings[?(@ > 5)]").expect("query");
        let values: Vec<f64> = result.iter().map(Node::must_numeric).collect();
        assert_eq!(values, vec![8.5, 9.25]);
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn mismatched_parentheses_abort_the_query() {
        assert!(path(STORE, "$.store.book[?(@.price < 10 && (@.x == 1)].title").is_err());
    }
}
