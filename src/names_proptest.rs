//! Property-based tests for scoped name rewriting.
//!
//! These tests use proptest to generate random names and references and
//! verify that rewriting only ever touches kind-qualified entity segments.

#[cfg(test)]
mod proptest_tests {
    use crate::kind::CATALOG;
    use crate::names::NameRewriter;
    use proptest::prelude::*;

    // Lowercase first letter keeps generated names from looking like a
    // kind qualifier themselves.
    fn name() -> impl Strategy<Value = String> {
        "[a-zа-я_][A-Za-zА-Яа-я0-9_]{0,12}"
    }

    proptest! {
        /// Property: after rewriting, no qualified reference to the source remains
        #[test]
        fn rewrite_removes_every_qualified_source_reference(
            source in name(),
            target in name(),
            suffix in "(\\.[A-Za-z]{1,8}){0,3}",
        ) {
            prop_assume!(source != target);
            let r = NameRewriter::new(&CATALOG, &source, &target).unwrap();
            let input = format!("cfg:CatalogRef.{}{} Catalog.{}{}", source, suffix, source, suffix);
            let output = r.rewrite(&input);
            prop_assert!(!r.references_source(&output));
            let expected = format!("cfg:CatalogRef.{}{} Catalog.{}{}", target, suffix, target, suffix);
            prop_assert_eq!(output.into_owned(), expected);
        }

        /// Property: strings without the source name are never modified
        #[test]
        fn rewrite_is_identity_without_source(
            source in name(),
            target in name(),
            text in "[A-Za-z0-9 .:<>/]{0,40}",
        ) {
            prop_assume!(!text.contains(&source));
            let r = NameRewriter::new(&CATALOG, &source, &target).unwrap();
            prop_assert_eq!(r.rewrite(&text).into_owned(), text);
        }

        /// Property: a longer name that merely starts with the source is kept
        #[test]
        fn rewrite_keeps_names_extending_the_source(
            source in name(),
            target in name(),
            extra in "[A-Za-z0-9_]{1,6}",
        ) {
            let r = NameRewriter::new(&CATALOG, &source, &target).unwrap();
            let input = format!("CatalogObject.{}{}", source, extra);
            prop_assert_eq!(r.rewrite(&input).into_owned(), input);
        }

        /// Property: other kinds' references are never modified
        #[test]
        fn rewrite_ignores_other_kinds(source in name(), target in name()) {
            let r = NameRewriter::new(&CATALOG, &source, &target).unwrap();
            let input = format!("DocumentRef.{} Enum.{}", source, source);
            prop_assert_eq!(r.rewrite(&input).into_owned(), input);
        }
    }
}
