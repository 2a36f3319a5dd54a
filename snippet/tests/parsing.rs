use snippet::action::{CommandLine, Shorthand, Visibility};
use snippet::parser::{Parser, scan};

fn parse(source: &str) -> snippet::Page {
    Parser::new(source.to_string(), 0)
        .parse()
        .expect("parse failed")
}

fn parse_err(source: &str) -> Vec<snippet::parser::MalformedDirective> {
    Parser::new(source.to_string(), 0)
        .parse()
        .expect_err("expected malformed snippet")
}

fn texts(commands: &[CommandLine]) -> Vec<&str> {
    commands.iter().map(CommandLine::text).collect()
}

#[test]
fn plain_document_has_no_directives() {
    let src = "# Notes\n\nSome text.\n\n```c\nint main() {}\n```\n";
    assert!(scan(src).is_empty());
    assert!(parse(src).is_empty());
}

#[test]
fn finds_directive_with_exact_span() {
    let src = "Intro\n\n```snippet\n{\"build\": [\"true\"], \"show\": [\"a.c\"]}\n```\n\nOutro\n";
    let directives = scan(src);
    assert_eq!(directives.len(), 1);

    let d = &directives[0];
    assert_eq!(
        d.text,
        "```snippet\n{\"build\": [\"true\"], \"show\": [\"a.c\"]}\n```"
    );
    assert_eq!(&src[d.span.clone()], d.text);
    assert_eq!(d.payload, "{\"build\": [\"true\"], \"show\": [\"a.c\"]}");
    assert_eq!(&src[d.payload_span()], d.payload);
    assert_eq!(d.line(src), 3);
}

#[test]
fn payload_may_span_lines() {
    let src = "```snippet\n{\n  \"build\": [\"make\"],\n  \"show\": [\"a.c\", \"b.c\"]\n}\n```";
    let page = parse(src);
    assert_eq!(page.snippets.len(), 1);
    assert_eq!(page.snippets[0].action.show, vec!["a.c", "b.c"]);
    assert_eq!(page.snippets[0].directive.text, src);
}

#[test]
fn directives_come_in_document_order() {
    let src = "```snippet\n{\"code\": \"one.c\"}\n```\n\ntext\n\n```snippet\n{\"code\": \"two.c\"}\n```\n";
    let page = parse(src);
    let shown: Vec<&str> = page
        .snippets
        .iter()
        .map(|s| s.action.show[0].as_str())
        .collect();
    assert_eq!(shown, vec!["one.c", "two.c"]);
}

#[test]
fn ignores_fences_that_are_not_bare_object_literals() {
    let cases = [
        "```snippet\nnot json\n```\n",
        "```snippet\n[1, 2]\n```\n",
        "```snippet\n```\n",
        "````snippet\n{\"code\": \"a.c\"}\n````\n",
        "```snippet extra\n{\"code\": \"a.c\"}\n```\n",
        "```snippet\r\n{\"code\": \"a.c\"}\r\n```\r\n",
        "> ```snippet\n> {\"code\": \"a.c\"}\n> ```\n",
        "```json\n{\"code\": \"a.c\"}\n```\n",
    ];
    for src in cases {
        assert!(scan(src).is_empty(), "unexpected match in {:?}", src);
    }
}

#[test]
fn fence_nested_in_another_code_block_is_not_a_directive() {
    let src = "````markdown\n```snippet\n{\"code\": \"a.c\"}\n```\n````\n";
    assert!(scan(src).is_empty());
}

#[test]
fn explicit_stages_default_run_and_clean() {
    let src = "```snippet\n{\"build\": [\"gcc -c a.c\"], \"show\": [\"a.c\"]}\n```";
    let action = &parse(src).snippets[0].action;
    assert_eq!(texts(&action.build), vec!["gcc -c a.c"]);
    assert!(action.run.is_empty());
    assert!(action.clean.is_empty());
    assert_eq!(action.visibility, Visibility::Echo);
}

#[test]
fn explicit_stages_keep_all_lists() {
    let src = "```snippet\n{\"build\": [\"gcc a.c\", \"gcc b.c\"], \"show\": [\"a.c\"], \"run\": [\"./a.out 3\"], \"clean\": [\"rm a.out\"], \"extra\": 1}\n```";
    let action = &parse(src).snippets[0].action;
    assert_eq!(texts(&action.build), vec!["gcc a.c", "gcc b.c"]);
    assert_eq!(texts(&action.run), vec!["./a.out 3"]);
    assert_eq!(texts(&action.clean), vec!["rm a.out"]);
}

#[test]
fn code_shorthand_expands_silently() {
    let src = "```snippet\n{\"code\": \"snippets/fib.c\"}\n```";
    let action = &parse(src).snippets[0].action;
    assert_eq!(texts(&action.build), vec!["gcc snippets/fib.c"]);
    assert_eq!(action.show, vec!["snippets/fib.c"]);
    assert_eq!(texts(&action.run), vec!["./a.out"]);
    assert_eq!(texts(&action.clean), vec!["rm a.out"]);
    assert!(action.is_silent());
}

#[test]
fn code_shorthand_uses_configured_toolchain() {
    let src = "```snippet\n{\"code\": \"main.c\"}\n```";
    let shorthand = Shorthand {
        compiler: "clang -Wall -o prog".to_string(),
        artifact: "prog".to_string(),
    };
    let page = Parser::new(src.to_string(), 0)
        .with_shorthand(shorthand)
        .parse()
        .expect("parse failed");
    let action = &page.snippets[0].action;
    assert_eq!(action.build[0].program(), "clang");
    assert_eq!(action.build[0].args(), ["-Wall", "-o", "prog", "main.c"]);
    assert_eq!(texts(&action.run), vec!["./prog"]);
    assert_eq!(texts(&action.clean), vec!["rm prog"]);
}

#[test]
fn code_wins_over_explicit_stages() {
    let src = "```snippet\n{\"code\": \"a.c\", \"build\": [\"make\"], \"show\": [\"b.c\"]}\n```";
    let action = &parse(src).snippets[0].action;
    assert_eq!(action.show, vec!["a.c"]);
    assert!(action.is_silent());
}

#[test]
fn code_ignores_stage_keys_of_any_type() {
    let src = "```snippet\n{\"code\": \"a.c\", \"run\": \"x\", \"build\": 1, \"clean\": [\"  \"]}\n```";
    let action = &parse(src).snippets[0].action;
    assert_eq!(action.show, vec!["a.c"]);
    assert_eq!(texts(&action.run), vec!["./a.out"]);
}

#[test]
fn code_must_be_a_string() {
    let errors = parse_err("```snippet\n{\"code\": [\"a.c\"]}\n```");
    assert!(errors[0].message.contains("`code`"), "{}", errors[0]);
}

#[test]
fn repeated_key_keeps_last_value() {
    let src = "```snippet\n{\"build\": [\"make\"], \"show\": [], \"build\": [\"gcc a.c\"]}\n```";
    let action = &parse(src).snippets[0].action;
    assert_eq!(texts(&action.build), vec!["gcc a.c"]);
}

#[test]
fn missing_build_is_malformed() {
    let errors = parse_err("```snippet\n{\"show\": [\"a.c\"]}\n```");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("`build`"), "{}", errors[0]);
}

#[test]
fn missing_show_is_malformed() {
    let errors = parse_err("```snippet\n{\"build\": []}\n```");
    assert!(errors[0].message.contains("`show`"), "{}", errors[0]);
}

#[test]
fn wrong_value_type_is_malformed() {
    let errors = parse_err("```snippet\n{\"build\": \"gcc a.c\", \"show\": []}\n```");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.starts_with("`build` must be a list of strings"), "{}", errors[0]);
}

#[test]
fn empty_command_is_malformed() {
    let errors = parse_err("```snippet\n{\"build\": [], \"show\": [], \"run\": [\"   \"]}\n```");
    assert!(errors[0].message.contains("`run` command #1"), "{}", errors[0]);
}

#[test]
fn invalid_json_points_into_the_payload() {
    let src = "Text first\n\n```snippet\n{\"build\": [\"true\",],\n \"show\": []}\n```\n";
    let errors = parse_err(src);
    assert_eq!(errors.len(), 1);

    let payload = scan(src)[0].payload_span();
    let span = &errors[0].span;
    assert!(
        span.start >= payload.start && span.end <= payload.end,
        "{:?} not in {:?}",
        span,
        payload
    );
    assert!(!errors[0].message.contains("at line"), "{}", errors[0].message);
}

#[test]
fn every_malformed_directive_is_reported() {
    let src = "```snippet\n{\"show\": []}\n```\n\n```snippet\n{\"code\": \"ok.c\"}\n```\n\n```snippet\n{\"build\": 1}\n```\n";
    assert_eq!(parse_err(src).len(), 2);
}

#[test]
fn command_lines_split_on_whitespace_only() {
    let cmd = CommandLine::parse("  echo  \"hello world\"\t$HOME ").expect("non-empty");
    assert_eq!(cmd.program(), "echo");
    assert_eq!(cmd.args(), ["\"hello", "world\"", "$HOME"]);
    assert_eq!(cmd.to_string(), "  echo  \"hello world\"\t$HOME ");
    assert!(CommandLine::parse(" \t\n").is_none());
}
