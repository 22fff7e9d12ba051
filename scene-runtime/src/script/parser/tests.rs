//! # Parser 测试
//!
//! 语句解析器的完整测试套件。

use super::*;
use crate::script::ast::{Block, Statement, StyleChange};
use crate::script::expr::BoolExpr;

fn parse(text: &str) -> Program {
    parse_program(text).unwrap()
}

fn body<'a>(program: &'a Program, id: &str) -> &'a [Statement] {
    &program.scene(id).unwrap().body
}

fn print(text: &str) -> Statement {
    Statement::Print {
        text: text.to_string(),
    }
}

// -------------------------------------------------------------------------
// 场景
// -------------------------------------------------------------------------

#[test]
fn test_parse_scenes() {
    let program = parse(
        r#"
scene CH0
print "hello"

SCENE ch1 trailing words ignored
go CH0
"#,
    );

    assert_eq!(program.scene_ids(), vec!["CH0", "ch1"]);
    assert_eq!(body(&program, "CH0"), &[print("hello")]);
    assert_eq!(
        body(&program, "ch1"),
        &[Statement::Goto {
            target: "CH0".to_string(),
            line: 6,
        }]
    );
    assert_eq!(program.scene("CH0").unwrap().line, 2);
    assert_eq!(program.scene("ch1").unwrap().line, 5);
}

#[test]
fn test_scene_without_id() {
    let err = parse_program("scene\nprint \"x\"").unwrap_err();
    assert_eq!(err, ParseError::missing(1, "scene", "场景 id"));
}

#[test]
fn test_lines_outside_scene_are_ignored() {
    let mut parser = Parser::new();
    let program = parser.parse("print \"lost\"\nscene A\nprint \"kept\"").unwrap();

    assert_eq!(body(&program, "A"), &[print("kept")]);
    assert_eq!(parser.warnings().len(), 1);
    assert!(parser.warnings()[0].contains("第 1 行"));
}

#[test]
fn test_duplicate_scene_replaced_with_warning() {
    let mut parser = Parser::new();
    let program = parser
        .parse("scene A\nprint \"old\"\nscene B\nscene A\nprint \"new\"")
        .unwrap();

    assert_eq!(program.scene_ids(), vec!["A", "B"]);
    assert_eq!(body(&program, "A"), &[print("new")]);
    assert!(parser.warnings().iter().any(|w| w.contains("重复定义")));
}

#[test]
fn test_empty_script() {
    assert!(parse("").is_empty());
    assert!(parse("; only a comment\n\n   \n").is_empty());
}

#[test]
fn test_warnings_reset_between_parses() {
    let mut parser = Parser::new();
    parser.parse("stray\nscene A").unwrap();
    assert_eq!(parser.warnings().len(), 1);

    parser.parse("scene A").unwrap();
    assert!(parser.warnings().is_empty());
}

// -------------------------------------------------------------------------
// 简单语句
// -------------------------------------------------------------------------

#[test]
fn test_simple_statements() {
    let program = parse(
        r#"
scene A
PRINT "Hi"
image "img/door.png"
set met_guard
unset met_guard
add key
remove key
background #202020
foreground white
font "Courier New"
font Georgia
fontsize 18px
"#,
    );

    assert_eq!(
        body(&program, "A"),
        &[
            print("Hi"),
            Statement::Image {
                source: "img/door.png".to_string()
            },
            Statement::SetFlag {
                id: "met_guard".to_string()
            },
            Statement::UnsetFlag {
                id: "met_guard".to_string()
            },
            Statement::AddItem {
                id: "key".to_string()
            },
            Statement::RemoveItem {
                id: "key".to_string()
            },
            Statement::StyleChange(StyleChange::Background("#202020".to_string())),
            Statement::StyleChange(StyleChange::Foreground("white".to_string())),
            Statement::StyleChange(StyleChange::Font("Courier New".to_string())),
            Statement::StyleChange(StyleChange::Font("Georgia".to_string())),
            Statement::StyleChange(StyleChange::FontSize(18)),
        ]
    );
}

#[test]
fn test_comments_and_escapes() {
    let program = parse(
        r#"
scene A ; 入口
print "a;b"
print "a" ; comment
print "line1\nline2\t\"done\""
"#,
    );

    assert_eq!(
        body(&program, "A"),
        &[
            print("a;b"),
            print("a"),
            print("line1\nline2\t\"done\""),
        ]
    );
}

#[test]
fn test_unknown_keywords_skipped() {
    let mut parser = Parser::new();
    let program = parser
        .parse("scene A\nwait 3\nprint \"x\"\nend\nelse\nprint\"glued\"")
        .unwrap();

    assert_eq!(body(&program, "A"), &[print("x")]);
    assert_eq!(parser.warnings().len(), 4);
}

// -------------------------------------------------------------------------
// 解析错误
// -------------------------------------------------------------------------

#[test]
fn test_missing_arguments() {
    let cases = [
        ("print", "print"),
        ("print hello", "print"),
        ("image", "image"),
        ("go", "go"),
        ("set", "set"),
        ("unset", "unset"),
        ("add", "add"),
        ("remove", "remove"),
        ("background", "background"),
        ("foreground", "foreground"),
        ("font", "font"),
        ("fontsize", "fontsize"),
        ("choice", "choice"),
    ];

    for (line, expected) in cases {
        let script = format!("scene A\n{line}");
        match parse_program(&script) {
            Err(ParseError::MissingArgument { line: 2, keyword, .. }) => {
                assert_eq!(keyword, expected, "输入: {line}");
            }
            other => panic!("输入 {line:?} 期望 MissingArgument，实际 {other:?}"),
        }
    }
}

#[test]
fn test_invalid_font_size() {
    assert_eq!(
        parse_program("scene A\nfontsize big"),
        Err(ParseError::InvalidNumber {
            line: 2,
            value: "big".to_string()
        })
    );
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        parse_program("scene A\n\nprint \"open"),
        Err(ParseError::UnterminatedString { line: 3 })
    );
}

#[test]
fn test_error_aborts_whole_script() {
    // 后面的场景即使合法也不产生 Program
    let result = parse_program("scene A\nprint\nscene B\nprint \"ok\"");
    assert!(result.is_err());
}

// -------------------------------------------------------------------------
// 块结构
// -------------------------------------------------------------------------

#[test]
fn test_choice_block() {
    let program = parse(
        r#"
scene A
choice "Open the door"
  set opened
  go B
END
print "after"
"#,
    );

    assert_eq!(
        body(&program, "A"),
        &[
            Statement::Choice {
                label: "Open the door".to_string(),
                body: vec![
                    Statement::SetFlag {
                        id: "opened".to_string()
                    },
                    Statement::Goto {
                        target: "B".to_string(),
                        line: 5,
                    },
                ]
                .into(),
            },
            print("after"),
        ]
    );
}

#[test]
fn test_if_else_block() {
    let program = parse(
        r#"
scene A
if has key and not door_open then
  print "unlock"
Else
  print "locked"
end
"#,
    );

    assert_eq!(
        body(&program, "A"),
        &[Statement::If {
            condition: BoolExpr::and(
                BoolExpr::has("key"),
                BoolExpr::not(BoolExpr::ident("door_open"))
            ),
            then_body: vec![print("unlock")].into(),
            else_body: vec![print("locked")].into(),
        }]
    );
}

#[test]
fn test_if_without_else() {
    let program = parse("scene A\nif true THEN\nprint \"t\"\nend\nprint \"after\"");

    assert_eq!(
        body(&program, "A"),
        &[
            Statement::If {
                condition: BoolExpr::True,
                then_body: vec![print("t")].into(),
                else_body: Block::from(vec![]),
            },
            print("after"),
        ]
    );
}

#[test]
fn test_nested_blocks() {
    let program = parse(
        r#"
scene A
if has key then
  choice "unlock"
    if lamp then
      print "lit"
    end
  end
else
  choice "locked"
  end
end
"#,
    );

    let Statement::If {
        then_body,
        else_body,
        ..
    } = &body(&program, "A")[0]
    else {
        panic!("期望 If 语句");
    };
    assert_eq!(then_body.len(), 1);
    assert_eq!(else_body.len(), 1);

    let Statement::Choice { label, body } = &then_body[0] else {
        panic!("期望 Choice 语句");
    };
    assert_eq!(label, "unlock");
    assert!(matches!(&body[0], Statement::If { then_body, .. } if then_body[..] == [print("lit")]));
    assert!(matches!(&else_body[0], Statement::Choice { body, .. } if body.is_empty()));
}

#[test]
fn test_if_without_then() {
    assert_eq!(
        parse_program("scene A\nif has key\nend"),
        Err(ParseError::missing(2, "if", "then"))
    );
}

#[test]
fn test_if_with_bad_condition() {
    assert!(matches!(
        parse_program("scene A\nif a && b then\nend"),
        Err(ParseError::InvalidCharacter { line: 2, ch: '&' })
    ));
    assert!(matches!(
        parse_program("scene A\nif then\nend"),
        Err(ParseError::MalformedExpression { line: 2, .. })
    ));
    assert!(matches!(
        parse_program("scene A\nif a b then\nend"),
        Err(ParseError::TrailingTokens { line: 2, .. })
    ));
}

#[test]
fn test_text_after_then_warns() {
    let mut parser = Parser::new();
    let program = parser.parse("scene A\nif a then print \"x\"\nend").unwrap();

    assert!(matches!(&body(&program, "A")[0], Statement::If { then_body, .. } if then_body.is_empty()));
    assert!(parser.warnings()[0].contains("then"));
}

#[test]
fn test_terminators_match_by_prefix() {
    // "ending" 以 end 开头，被视为块结束
    let program = parse("scene A\nchoice \"c\"\nprint \"in\"\nending\nprint \"out\"");

    assert_eq!(
        body(&program, "A"),
        &[
            Statement::Choice {
                label: "c".to_string(),
                body: vec![print("in")].into(),
            },
            print("out"),
        ]
    );
}

#[test]
fn test_unterminated_block_stops_at_next_scene() {
    let mut parser = Parser::new();
    let program = parser
        .parse("scene A\nchoice \"c\"\nprint \"in\"\nscene B\nprint \"b\"")
        .unwrap();

    assert_eq!(program.scene_ids(), vec!["A", "B"]);
    assert_eq!(body(&program, "B"), &[print("b")]);
    assert!(matches!(&body(&program, "A")[0], Statement::Choice { body, .. } if body.len() == 1));
    assert!(parser.warnings().iter().any(|w| w.contains("缺少 'end'")));
}

#[test]
fn test_unterminated_if_at_end_of_input() {
    let mut parser = Parser::new();
    let program = parser.parse("scene A\nif a then\nprint \"x\"\nelse\nprint \"y\"").unwrap();

    assert!(matches!(
        &body(&program, "A")[0],
        Statement::If { then_body, else_body, .. }
            if then_body.len() == 1 && else_body.len() == 1
    ));
    assert_eq!(parser.warnings().len(), 1);
}

#[test]
fn test_goto_inside_if() {
    let program = parse("scene A\nif true then go B print \"unreachable\" end");

    // then 之后的内容被忽略，块在输入结束处闭合
    assert!(matches!(
        &body(&program, "A")[0],
        Statement::If { then_body, .. } if then_body.is_empty()
    ));
}

// -------------------------------------------------------------------------
// 确定性
// -------------------------------------------------------------------------

#[test]
fn test_parsing_is_deterministic() {
    let script = r#"
scene CH0
background navy
print "start"
choice "a"
  add key
  go CH1
end
if has key then
  choice "b"
  end
end

scene CH1
print "next"
"#;

    assert_eq!(parse(script), parse(script));
}
