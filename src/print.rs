//! Code printing and the decorator placement fix-up.
//!
//! The fix-up is a text-level patch for a printer defect: some serializations
//! place a class decorator after the `export` (and optional `default`)
//! keywords, which is not valid syntax. It deliberately runs on the printed
//! text, not the AST, so it can be deleted independently once the printer is
//! fixed. Only the `export [default] <decorators> class` misplacement is
//! handled; decorator forms on non-class exports are unsupported.

use lazy_static::lazy_static;
use oxc_ast::ast::Program;
use oxc_codegen::Codegen;
use regex::Regex;

lazy_static! {
    /// `export [default] @Dec(...) @Other class` — one or more decorators
    /// stranded between the export keywords and `class`. The stranded text
    /// is captured whole, lazily up to the nearest `class`, so decorator
    /// arguments may contain nested parens and brackets.
    static ref MISPLACED_DECORATOR_RE: Regex =
        Regex::new(r"(export\s+(?:default\s+)?)(@[\s\S]+?)(class\b)").unwrap();
}

/// Serialize a program back to source text.
pub fn print_program(program: &Program<'_>) -> String {
    Codegen::new().build(program).code
}

/// Hoist stranded class decorators back in front of the `export` keywords.
///
/// Applied globally so each decorated class export in a file is corrected
/// independently. Idempotent: once the decorators precede `export`, the
/// pattern no longer matches. Input without the misplacement is returned
/// byte-identical.
pub fn fix_decorator_placement(code: &str) -> String {
    MISPLACED_DECORATOR_RE
        .replace_all(code, |caps: &regex::Captures| {
            format!("{}\n{}{}", caps[2].trim_end(), &caps[1], &caps[3])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_decorators_is_untouched() {
        let code = "export class Foo {}\nexport default class Bar {}\n";
        assert_eq!(fix_decorator_placement(code), code);
    }

    #[test]
    fn test_hoists_decorator_before_export() {
        let fixed = fix_decorator_placement("export @Injectable() class Svc {}");
        assert_eq!(fixed, "@Injectable()\nexport class Svc {}");
    }

    #[test]
    fn test_hoists_decorator_before_export_default() {
        let fixed = fix_decorator_placement("export default @Component({ tag: 1 }) class App {}");
        assert_eq!(fixed, "@Component({ tag: 1 })\nexport default class App {}");
    }

    #[test]
    fn test_multiple_decorators_kept_in_order() {
        let fixed = fix_decorator_placement("export @A() @B class C {}");
        assert_eq!(fixed, "@A() @B\nexport class C {}");
    }

    #[test]
    fn test_each_class_corrected_independently() {
        let code = "export @A class One {}\nexport default @B() class Two {}";
        let fixed = fix_decorator_placement(code);
        assert!(fixed.contains("@A\nexport class One {}"));
        assert!(fixed.contains("@B()\nexport default class Two {}"));
    }

    #[test]
    fn test_fixup_is_idempotent() {
        let once = fix_decorator_placement("export @Injectable() class Svc {}");
        let twice = fix_decorator_placement(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_decorator_arguments_with_nested_parens() {
        let fixed = fix_decorator_placement(
            "export @Component({ providers: [provide()] }) class App {}",
        );
        assert_eq!(fixed, "@Component({ providers: [provide()] })\nexport class App {}");
    }

    #[test]
    fn test_member_expression_decorator() {
        let fixed = fix_decorator_placement("export @ng.Injectable() class Svc {}");
        assert_eq!(fixed, "@ng.Injectable()\nexport class Svc {}");
    }
}
