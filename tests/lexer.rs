mod lexer_tests {
    use triangle_core::common::position::Position;
    use triangle_core::error_reporter::ErrorReporter;
    use triangle_core::frontend::lexer::{Token, TokenType};
    use triangle_core::{Lexer, Scanner};

    fn tokenize(source: &str) -> (Vec<Token>, ErrorReporter) {
        let mut reporter = ErrorReporter::new();
        let tokens = Lexer::new(Scanner::new(source)).get_all_tokens(&mut reporter);
        (tokens, reporter)
    }

    #[test]
    fn test_lexer_keywords() {
        let (tokens, reporter) =
            tokenize("begin const do else end if in let repeat then type until var while");

        assert_eq!(reporter.error_count(), 0);
        let types: Vec<TokenType> = tokens.iter().map(|t| t.ty).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Begin,
                TokenType::Const,
                TokenType::Do,
                TokenType::Else,
                TokenType::End,
                TokenType::If,
                TokenType::In,
                TokenType::Let,
                TokenType::Repeat,
                TokenType::Then,
                TokenType::Type,
                TokenType::Until,
                TokenType::Var,
                TokenType::While,
                TokenType::EndOfText,
            ]
        );
    }

    #[test]
    fn test_spellings_rebuild_the_source() {
        let source = "let\n  var x : integer ! the counter\nin\n  x := x + 1 ; put ( 'a' )";
        let (tokens, reporter) = tokenize(source);
        assert_eq!(reporter.error_count(), 0);

        let rebuilt: String = tokens.iter().map(|t| t.spelling.as_str()).collect();
        let significant: String = source
            .lines()
            .map(|line| line.split('!').next().unwrap_or(""))
            .flat_map(|line| line.split_whitespace())
            .collect();

        // the only significant space in a Triangle program is inside a
        // character literal, and this one holds none
        assert_eq!(rebuilt, significant);
    }

    #[test]
    fn test_exactly_one_end_of_text() {
        for source in ["", "   ", "! only a comment", "x := 1 ;", "let Bad in"] {
            let (tokens, _) = tokenize(source);
            let ends = tokens
                .iter()
                .filter(|t| t.ty == TokenType::EndOfText)
                .count();

            assert_eq!(ends, 1, "{:?}", source);
            assert_eq!(tokens.last().map(|t| t.ty), Some(TokenType::EndOfText));
        }
    }

    #[test]
    fn test_uppercase_inside_identifier() {
        let (tokens, reporter) = tokenize("abcDef");

        assert_eq!(reporter.error_count(), 1);
        assert_eq!(
            reporter.message_at(Position::new(1, 4)),
            Some("Input cannot have uppercase letters")
        );

        // scanning of the identifier stops at the uppercase letter
        assert_eq!(tokens[0].ty, TokenType::Error);
        assert_eq!(tokens[0].spelling, "abcD");
        assert_eq!(tokens[1].spelling, "ef");
    }

    #[test]
    fn test_capitalised_keyword() {
        let (tokens, reporter) = tokenize("Let x ~ 1 in x := 4");

        assert_eq!(reporter.error_count(), 1);
        assert_eq!(
            reporter.message_at(Position::new(1, 1)),
            Some("Input cannot have uppercase letters")
        );
        assert!(tokens.iter().all(|t| t.ty != TokenType::Let));
    }
}
