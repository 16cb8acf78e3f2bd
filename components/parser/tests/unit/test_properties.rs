//! Property tests for the lexer and parser

use core_types::{Options, Source};
use parser::{parse, tokenize, Context, Tree};
use proptest::prelude::*;

fn context(text: &str) -> Context {
    let mut ctx = Context::new(Options::default(), &[]);
    ctx.lines = Source::from(text).into_lines();
    ctx
}

proptest! {
    #[test]
    fn test_parse_never_panics(text in "[a-z(){};=+ \\n\"0-9.,\\[\\]`]{0,60}") {
        let mut ctx = context(&text);
        if tokenize(&mut ctx).is_ok() {
            let (tree, _) = parse(&mut ctx);
            if let Some(Tree::Program(body)) = tree {
                prop_assert!(body.len() <= ctx.tokens.len());
            }
        }
    }

    #[test]
    fn test_token_positions_are_ordered(text in "[a-z =;+\\n]{0,80}") {
        let mut ctx = context(&text);
        if tokenize(&mut ctx).is_ok() {
            for pair in ctx.tokens.windows(2) {
                prop_assert!((pair[0].line, pair[0].from) <= (pair[1].line, pair[1].from));
            }
        }
    }
}
