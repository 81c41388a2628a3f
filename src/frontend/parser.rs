use log::debug;

use super::{
    ast::*,
    lexer::{Token, TokenType},
};
use crate::common::{error_reporter::ErrorReporter, position::Position};

// tokens a failed command skips forward to
const COMMAND_BOUNDARIES: &[TokenType] = &[
    TokenType::Semicolon,
    TokenType::End,
    TokenType::Else,
    TokenType::Until,
    TokenType::In,
];

// tokens a failed declaration skips forward to
const DECLARATION_BOUNDARIES: &[TokenType] = &[TokenType::Semicolon, TokenType::In];

// deepest nesting of commands and expressions the later passes recurse through
pub const MAX_NESTING_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub position: Position,
    pub message: String,
}

type ParseResult<T> = Result<T, ParseError>;

/// Recursive descent parser, one method per grammar rule.
///
/// Syntax errors are collected while parsing and handed to the reporter
/// once the whole program has been read, so a single pass surfaces every
/// error the parser can recover from.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    errors: Vec<ParseError>,

    // commands and expressions currently open around the token
    depth: usize,
    too_deep: bool,

    id_gen: NodeIdGenerator,

    // returned by `peek` if the token slice lacks its end-of-text token
    end_of_text: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let position = tokens.last().map(|t| t.position).unwrap_or_default();
        Self {
            tokens,
            current: 0,
            errors: vec![],
            depth: 0,
            too_deep: false,
            id_gen: NodeIdGenerator::new(),
            end_of_text: Token {
                ty: TokenType::EndOfText,
                spelling: String::new(),
                position,
            },
        }
    }

    pub fn parse(&mut self, reporter: &mut ErrorReporter) -> Program {
        let position = self.peek().position;
        let mut commands = vec![self.command()];

        // a stray closing keyword ends `command` early; skip it and carry on
        while !self.check(TokenType::EndOfText) {
            let error = self.error("end of text");
            self.record(error);
            self.advance();
            commands.push(self.command());
        }
        let command = sequence(commands, position);

        debug!("parsed program with {} syntax error(s)", self.errors.len());
        for error in self.errors.drain(..) {
            reporter.report(error.position, error.message);
        }

        Program { command, position }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.end_of_text)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.ty != TokenType::EndOfText {
            self.current += 1;
        }
        token
    }

    fn check(&self, ty: TokenType) -> bool {
        self.peek().ty == ty
    }

    // advance if and only if the current token has the given type
    fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ty: TokenType) -> ParseResult<Token> {
        if self.check(ty) {
            Ok(self.advance())
        } else {
            Err(self.error(&ty.to_string()))
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = match token.ty {
            TokenType::EndOfText => "end of text".to_string(),
            _ => format!("'{}'", token.spelling),
        };

        ParseError {
            position: token.position,
            message: format!("Expected {} but found {}", expected, found),
        }
    }

    fn record(&mut self, error: ParseError) {
        if !self.too_deep {
            self.errors.push(error);
        }
    }

    fn nested<T>(
        &mut self,
        construct: &str,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            let error = ParseError {
                position: self.peek().position,
                message: format!("{} is nested too deeply", construct),
            };
            self.record(error.clone());

            // the rest of the input is skipped and later errors are dropped
            self.too_deep = true;
            self.current = self.tokens.len();
            return Err(error);
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn synchronize(&mut self, boundaries: &[TokenType]) {
        while !self.check(TokenType::EndOfText) && !boundaries.contains(&self.peek().ty) {
            self.advance();
        }
    }

    ///
    /// Commands
    ///

    fn command(&mut self) -> Command {
        let position = self.peek().position;
        let mut commands = vec![self.single_command()];

        while self.match_token(TokenType::Semicolon) {
            commands.push(self.single_command());
        }

        sequence(commands, position)
    }

    fn single_command(&mut self) -> Command {
        let position = self.peek().position;

        match self.nested("Command", Self::try_single_command) {
            Ok(command) => command,
            Err(error) => {
                self.record(error);
                self.synchronize(COMMAND_BOUNDARIES);
                Command::new(CommandKind::Blank, position)
            }
        }
    }

    fn try_single_command(&mut self) -> ParseResult<Command> {
        let position = self.peek().position;

        let kind = match self.peek().ty {
            TokenType::Semicolon
            | TokenType::End
            | TokenType::Else
            | TokenType::Until
            | TokenType::In
            | TokenType::EndOfText => CommandKind::Blank,
            TokenType::Identifier => {
                let identifier = self.identifier()?;

                if self.match_token(TokenType::Becomes) {
                    CommandKind::Assign(AssignCommand {
                        target: identifier,
                        expression: self.expression()?,
                    })
                } else if self.match_token(TokenType::LeftBracket) {
                    let parameter = self.parameter()?;
                    self.expect(TokenType::RightBracket)?;
                    CommandKind::Call(CallCommand {
                        procedure: identifier,
                        parameter,
                    })
                } else {
                    return Err(self.error("':=' or '('"));
                }
            }
            TokenType::Begin => {
                self.advance();
                let command = self.command();
                self.expect(TokenType::End)?;
                return Ok(command);
            }
            TokenType::Let => {
                self.advance();
                let declaration = self.declaration();
                self.expect(TokenType::In)?;
                CommandKind::Let(LetCommand {
                    declaration,
                    body: Box::new(self.command()),
                })
            }
            TokenType::If => {
                self.advance();
                let condition = self.expression()?;
                self.expect(TokenType::Then)?;
                let then_branch = self.single_command();

                let else_branch = if self.match_token(TokenType::Else) {
                    self.single_command()
                } else {
                    Command::new(CommandKind::NoElse, self.peek().position)
                };

                CommandKind::If(IfCommand {
                    condition,
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                })
            }
            TokenType::While => {
                self.advance();
                let condition = self.expression()?;
                self.expect(TokenType::Do)?;
                CommandKind::While(WhileCommand {
                    condition,
                    body: Box::new(self.single_command()),
                })
            }
            TokenType::Repeat => {
                self.advance();
                let body = self.single_command();
                self.expect(TokenType::Until)?;
                CommandKind::Repeat(RepeatCommand {
                    body: Box::new(body),
                    until: self.expression()?,
                })
            }
            _ => return Err(self.error("a command")),
        };

        Ok(Command::new(kind, position))
    }

    ///
    /// Declarations
    ///

    fn declaration(&mut self) -> Declaration {
        let position = self.peek().position;
        let mut declarations: Vec<Declaration> = self.single_declaration().into_iter().collect();

        while self.match_token(TokenType::Semicolon) {
            declarations.extend(self.single_declaration());
        }

        match <[Declaration; 1]>::try_from(declarations) {
            Ok([declaration]) => declaration,
            Err(declarations) => Declaration {
                id: self.id_gen.next(),
                kind: DeclarationKind::Sequence(declarations),
                position,
            },
        }
    }

    // a declaration that fails to parse is left out of the tree
    fn single_declaration(&mut self) -> Option<Declaration> {
        match self.try_single_declaration() {
            Ok(declaration) => Some(declaration),
            Err(error) => {
                self.record(error);
                self.synchronize(DECLARATION_BOUNDARIES);
                None
            }
        }
    }

    fn try_single_declaration(&mut self) -> ParseResult<Declaration> {
        let position = self.peek().position;

        let kind = match self.peek().ty {
            TokenType::Const => {
                self.advance();
                let identifier = self.identifier()?;
                self.expect(TokenType::Is)?;
                DeclarationKind::Const(ConstDeclaration {
                    identifier,
                    expression: self.expression()?,
                })
            }
            TokenType::Var => {
                self.advance();
                let identifier = self.identifier()?;
                self.expect(TokenType::Colon)?;
                DeclarationKind::Var(VarDeclaration {
                    identifier,
                    type_denoter: self.type_denoter()?,
                })
            }
            TokenType::Type => {
                self.advance();
                let identifier = self.identifier()?;
                self.expect(TokenType::Is)?;
                DeclarationKind::Type(TypeDeclaration {
                    identifier,
                    type_denoter: self.type_denoter()?,
                })
            }
            _ => return Err(self.error("a declaration")),
        };

        Ok(Declaration {
            id: self.id_gen.next(),
            kind,
            position,
        })
    }

    fn type_denoter(&mut self) -> ParseResult<TypeDenoter> {
        let position = self.peek().position;
        let identifier = self.identifier()?;

        Ok(TypeDenoter {
            kind: TypeDenoterKind::Named(identifier),
            position,
        })
    }

    fn parameter(&mut self) -> ParseResult<Parameter> {
        let position = self.peek().position;

        let kind = match self.peek().ty {
            TokenType::RightBracket => ParameterKind::Blank,
            TokenType::Var => {
                self.advance();
                ParameterKind::Var(self.identifier()?)
            }
            _ => ParameterKind::Value(self.expression()?),
        };

        Ok(Parameter { kind, position })
    }

    fn identifier(&mut self) -> ParseResult<Identifier> {
        let token = self.expect(TokenType::Identifier)?;
        Ok(Identifier::new(token.spelling, token.position))
    }

    ///
    /// Expressions
    ///

    fn expression(&mut self) -> ParseResult<Expression> {
        self.binary_expression(1)
    }

    // precedence climbing: only operators binding at least as tightly as
    // `min_precedence` are folded into this level
    fn binary_expression(&mut self, min_precedence: u8) -> ParseResult<Expression> {
        let mut left = self.primary()?;

        while self.check(TokenType::Operator) {
            let precedence = precedence(&self.peek().spelling);
            if precedence < min_precedence {
                break;
            }

            let token = self.advance();
            let operator = Operator::new(token.spelling, token.position);
            let right = self.binary_expression(precedence + 1)?;

            let position = left.position;
            left = Expression::new(
                ExpressionKind::Binary(BinaryExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                }),
                position,
            );
        }

        Ok(left)
    }

    fn primary(&mut self) -> ParseResult<Expression> {
        self.nested("Expression", Self::try_primary)
    }

    fn try_primary(&mut self) -> ParseResult<Expression> {
        let position = self.peek().position;

        let kind = match self.peek().ty {
            TokenType::IntLiteral => ExpressionKind::IntLiteral(self.advance().spelling),
            TokenType::CharLiteral => {
                // spelling is the graphic between two quotes
                let graphic = self.peek().spelling.chars().nth(1);
                match graphic {
                    Some(c) => {
                        self.advance();
                        ExpressionKind::CharLiteral(c)
                    }
                    None => return Err(self.error("a character literal")),
                }
            }
            TokenType::Identifier => ExpressionKind::Identifier(self.identifier()?),
            TokenType::Operator => {
                let token = self.advance();
                ExpressionKind::Unary(UnaryExpression {
                    operator: Operator::new(token.spelling, token.position),
                    operand: Box::new(self.primary()?),
                })
            }
            TokenType::LeftBracket => {
                self.advance();
                let expression = self.expression()?;
                self.expect(TokenType::RightBracket)?;
                return Ok(expression);
            }
            _ => return Err(self.error("an expression")),
        };

        Ok(Expression::new(kind, position))
    }
}

fn sequence(commands: Vec<Command>, position: Position) -> Command {
    match <[Command; 1]>::try_from(commands) {
        Ok([command]) => command,
        Err(commands) => Command::new(CommandKind::Sequence(commands), position),
    }
}

fn precedence(spelling: &str) -> u8 {
    match spelling {
        "*" | "/" => 3,
        "+" | "-" => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{lexer::Lexer, scanner::Scanner};

    fn parse(source: &str) -> (Program, ErrorReporter) {
        let mut reporter = ErrorReporter::new();
        let tokens = Lexer::new(Scanner::new(source)).get_all_tokens(&mut reporter);
        let program = Parser::new(&tokens).parse(&mut reporter);
        (program, reporter)
    }

    fn parse_ok(source: &str) -> Program {
        let (program, reporter) = parse(source);
        assert_eq!(
            reporter.error_count(),
            0,
            "unexpected errors: {:?}",
            reporter.diagnostics().collect::<Vec<_>>()
        );
        program
    }

    fn expression_of(program: &Program) -> &Expression {
        match &program.command.kind {
            CommandKind::Assign(assign) => &assign.expression,
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    // renders an expression with explicit brackets
    fn bracketed(expression: &Expression) -> String {
        match &expression.kind {
            ExpressionKind::IntLiteral(spelling) => spelling.clone(),
            ExpressionKind::CharLiteral(c) => format!("'{}'", c),
            ExpressionKind::Identifier(identifier) => identifier.spelling.clone(),
            ExpressionKind::Unary(unary) => {
                format!("({}{})", unary.operator.spelling, bracketed(&unary.operand))
            }
            ExpressionKind::Binary(binary) => format!(
                "({} {} {})",
                bracketed(&binary.left),
                binary.operator.spelling,
                bracketed(&binary.right)
            ),
        }
    }

    #[test]
    fn test_assignment() {
        let program = parse_ok("x := 4");

        match &program.command.kind {
            CommandKind::Assign(assign) => {
                assert_eq!(assign.target.spelling, "x");
                assert_eq!(assign.expression.kind, ExpressionKind::IntLiteral("4".into()));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_call_parameters() {
        let program = parse_ok("putint(x); getint(var y); puteol()");

        let CommandKind::Sequence(commands) = &program.command.kind else {
            panic!("expected sequence");
        };
        assert_eq!(commands.len(), 3);

        let parameters: Vec<_> = commands
            .iter()
            .map(|command| match &command.kind {
                CommandKind::Call(call) => &call.parameter.kind,
                other => panic!("expected call, got {:?}", other),
            })
            .collect();

        assert!(matches!(parameters[0], ParameterKind::Value(_)));
        assert!(matches!(parameters[1], ParameterKind::Var(id) if id.spelling == "y"));
        assert_eq!(parameters[2], &ParameterKind::Blank);
    }

    #[test]
    fn test_if_without_else_gets_sentinel() {
        let program = parse_ok("if b then x := 1");

        let CommandKind::If(if_command) = &program.command.kind else {
            panic!("expected if");
        };
        assert_eq!(if_command.else_branch.kind, CommandKind::NoElse);
        assert_eq!(if_command.else_branch.position, Position::new(1, 17));
    }

    #[test]
    fn test_if_with_else() {
        let program = parse_ok("if b then x := 1 else x := 2");

        let CommandKind::If(if_command) = &program.command.kind else {
            panic!("expected if");
        };
        assert!(matches!(if_command.else_branch.kind, CommandKind::Assign(_)));
    }

    #[test]
    fn test_let_body_extends_over_sequence() {
        let program = parse_ok("let var x : integer in x := 4 ; putint ( x )");

        let CommandKind::Let(let_command) = &program.command.kind else {
            panic!("expected let, got {:?}", program.command.kind);
        };
        assert!(matches!(let_command.declaration.kind, DeclarationKind::Var(_)));
        assert!(matches!(&let_command.body.kind, CommandKind::Sequence(c) if c.len() == 2));
    }

    #[test]
    fn test_declaration_sequence() {
        let program = parse_ok("let const c ~ 1; var v : integer; type t ~ char in v := c");

        let CommandKind::Let(let_command) = &program.command.kind else {
            panic!("expected let");
        };
        let DeclarationKind::Sequence(declarations) = &let_command.declaration.kind else {
            panic!("expected declaration sequence");
        };
        assert!(matches!(declarations[0].kind, DeclarationKind::Const(_)));
        assert!(matches!(declarations[1].kind, DeclarationKind::Var(_)));
        assert!(matches!(declarations[2].kind, DeclarationKind::Type(_)));

        // every declaration has its own handle
        assert_ne!(declarations[0].id, declarations[1].id);
        assert_ne!(declarations[1].id, declarations[2].id);
    }

    #[test]
    fn test_loops() {
        let program = parse_ok("while x < 10 do x := x + 1; repeat x := x - 1 until x = 0");

        let CommandKind::Sequence(commands) = &program.command.kind else {
            panic!("expected sequence");
        };
        assert!(matches!(commands[0].kind, CommandKind::While(_)));
        let CommandKind::Repeat(repeat) = &commands[1].kind else {
            panic!("expected repeat");
        };
        assert!(matches!(repeat.body.kind, CommandKind::Assign(_)));
        assert_eq!(bracketed(&repeat.until), "(x = 0)");
    }

    #[test]
    fn test_begin_end_and_blank_commands() {
        let program = parse_ok("begin ; x := 1 ; end");

        let CommandKind::Sequence(commands) = &program.command.kind else {
            panic!("expected sequence");
        };
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].kind, CommandKind::Blank);
        assert_eq!(commands[2].kind, CommandKind::Blank);
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(bracketed(expression_of(&parse_ok("x := 1 + 2 * 3"))), "(1 + (2 * 3))");
        assert_eq!(bracketed(expression_of(&parse_ok("x := 1 - 2 - 3"))), "((1 - 2) - 3)");
        assert_eq!(
            bracketed(expression_of(&parse_ok("x := a + 1 < b * 2"))),
            "((a + 1) < (b * 2))"
        );
        assert_eq!(bracketed(expression_of(&parse_ok("x := (1 + 2) * 3"))), "((1 + 2) * 3)");
    }

    #[test]
    fn test_unary_binds_tightest() {
        assert_eq!(bracketed(expression_of(&parse_ok("x := -a + 1"))), "((-a) + 1)");
        assert_eq!(bracketed(expression_of(&parse_ok("b := \\ \\ c"))), "(\\(\\c))");
    }

    #[test]
    fn test_char_literal_expression() {
        let program = parse_ok("put('a')");

        let CommandKind::Call(call) = &program.command.kind else {
            panic!("expected call");
        };
        let ParameterKind::Value(expression) = &call.parameter.kind else {
            panic!("expected value parameter");
        };
        assert_eq!(expression.kind, ExpressionKind::CharLiteral('a'));
    }

    #[test]
    fn test_node_positions() {
        let program = parse_ok("x := y + 2");
        let expression = expression_of(&program);

        assert_eq!(program.command.position, Position::new(1, 1));
        assert_eq!(expression.position, Position::new(1, 6));
        let ExpressionKind::Binary(binary) = &expression.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(binary.operator.position, Position::new(1, 8));
    }

    #[test]
    fn test_syntax_error_message() {
        let (_, reporter) = parse("x 4");

        assert_eq!(reporter.error_count(), 1);
        assert_eq!(
            reporter.message_at(Position::new(1, 3)),
            Some("Expected ':=' or '(' but found '4'")
        );
    }

    #[test]
    fn test_recovers_to_report_later_errors() {
        let (program, reporter) = parse("x := ; y := 2 ; z 3 ; w := 1");

        assert_eq!(reporter.error_count(), 2);
        assert!(reporter.message_at(Position::new(1, 6)).is_some());
        assert!(reporter.message_at(Position::new(1, 19)).is_some());

        let CommandKind::Sequence(commands) = &program.command.kind else {
            panic!("expected sequence");
        };
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0].kind, CommandKind::Blank);
        assert!(matches!(commands[3].kind, CommandKind::Assign(_)));
    }

    #[test]
    fn test_recovers_inside_declarations() {
        let (_, reporter) = parse("let const c ~ ; var v integer in v := 1 + ");

        assert_eq!(reporter.error_count(), 3);
        assert!(reporter.message_at(Position::new(1, 15)).is_some());
        assert!(reporter.message_at(Position::new(1, 23)).is_some());
    }

    #[test]
    fn test_trailing_tokens_are_an_error() {
        let (_, reporter) = parse("x := 1 end");

        assert_eq!(reporter.error_count(), 1);
        assert_eq!(
            reporter.message_at(Position::new(1, 8)),
            Some("Expected end of text but found 'end'")
        );
    }

    #[test]
    fn test_parsing_continues_after_stray_keyword() {
        let (program, reporter) = parse("if b then x := 1 end ; y 4");

        assert_eq!(reporter.error_count(), 2);
        assert_eq!(
            reporter.message_at(Position::new(1, 18)),
            Some("Expected end of text but found 'end'")
        );
        assert_eq!(
            reporter.message_at(Position::new(1, 26)),
            Some("Expected ':=' or '(' but found '4'")
        );

        let CommandKind::Sequence(commands) = &program.command.kind else {
            panic!("expected sequence");
        };
        assert!(matches!(commands[0].kind, CommandKind::If(_)));
    }

    #[test]
    fn test_deep_expression_nesting_is_an_error() {
        let depth = MAX_NESTING_DEPTH * 4;
        let source = format!("x := {}1{}", "(".repeat(depth), ")".repeat(depth));
        let (_, reporter) = parse(&source);

        assert_eq!(reporter.error_count(), 1);
        let messages: Vec<_> = reporter.diagnostics().map(|d| d.message).collect();
        assert_eq!(messages, vec!["Expression is nested too deeply"]);

        let source = format!("x := {}1", "- ".repeat(depth));
        let (_, reporter) = parse(&source);
        assert_eq!(reporter.error_count(), 1);

        let source = format!("x := {}1{}", "(".repeat(50), ")".repeat(50));
        parse_ok(&source);
    }

    #[test]
    fn test_deep_command_nesting_is_an_error() {
        let depth = MAX_NESTING_DEPTH * 4;
        let source = format!("{}x := 1{}", "begin ".repeat(depth), " end".repeat(depth));
        let (_, reporter) = parse(&source);

        assert_eq!(reporter.error_count(), 1);
        let messages: Vec<_> = reporter.diagnostics().map(|d| d.message).collect();
        assert_eq!(messages, vec!["Command is nested too deeply"]);
    }

    #[test]
    fn test_empty_program() {
        let program = parse_ok("");

        assert_eq!(program.command.kind, CommandKind::Blank);
    }

    #[test]
    fn test_missing_tokens_reported_at_end_of_text() {
        let (_, reporter) = parse("if x then");

        // the blank then-branch is fine; nothing else is missing
        assert_eq!(reporter.error_count(), 0);

        let (_, reporter) = parse("while x");
        assert_eq!(
            reporter.message_at(Position::new(1, 8)),
            Some("Expected 'do' but found end of text")
        );
    }
}
