mod scanner_tests {
    use rox::error::LoxError;
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn one_or_two_character_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_token_sequence(
            "var language = nil; while whilst",
            &[
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "language"),
                (TokenType::EQUAL, "="),
                (TokenType::NIL, "nil"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::WHILE, "while"),
                (TokenType::IDENTIFIER, "whilst"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn number_literals() {
        let tokens: Vec<Token> = Scanner::new(b"12 12.5 0.5")
            .filter_map(Result::ok)
            .collect();

        let values: Vec<f64> = tokens
            .iter()
            .filter_map(|t| match t.token_type {
                TokenType::NUMBER(n) => Some(n),
                _ => None,
            })
            .collect();

        assert_eq!(values, vec![12.0, 12.5, 0.5]);
    }

    #[test]
    fn no_leading_or_trailing_dot_in_numbers() {
        // "12." is NUMBER then DOT; ".5" is DOT then NUMBER.
        assert_token_sequence(
            "12. .5",
            &[
                (TokenType::NUMBER(0.0), "12"),
                (TokenType::DOT, "."),
                (TokenType::DOT, "."),
                (TokenType::NUMBER(0.0), "5"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn string_literal_keeps_quotes_in_lexeme() {
        let tokens: Vec<Token> = Scanner::new(b"\"hi there\"")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens[0].lexeme, "\"hi there\"");

        match &tokens[0].token_type {
            TokenType::STRING(literal) => assert_eq!(literal, "hi there"),
            other => panic!("expected STRING, got {:?}", other),
        }
    }

    #[test]
    fn multiline_string_advances_line_counter() {
        let tokens: Vec<Token> = Scanner::new(b"\"a\nb\"\nx")
            .filter_map(Result::ok)
            .collect();

        // The string closes on line 2; `x` sits on line 3.
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn line_comments_are_skipped() {
        assert_token_sequence(
            "1 // the rest is noise + - *\n2",
            &[
                (TokenType::NUMBER(0.0), "1"),
                (TokenType::NUMBER(0.0), "2"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn block_comments_are_skipped() {
        assert_token_sequence(
            "1 /* spans\nlines */ 2",
            &[
                (TokenType::NUMBER(0.0), "1"),
                (TokenType::NUMBER(0.0), "2"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn block_comments_do_not_nest() {
        // The first `*/` closes the comment; the rest is real input.
        assert_token_sequence(
            "/* /* */ x",
            &[(TokenType::IDENTIFIER, "x"), (TokenType::EOF, "")],
        );
    }

    #[test]
    fn unterminated_block_comment_reports_opening_line() {
        let errors: Vec<LoxError> = Scanner::new(b"1\n/* never\ncloses")
            .filter_map(Result::err)
            .collect();

        assert_eq!(errors.len(), 1);

        match &errors[0] {
            LoxError::Lex { line, message } => {
                assert_eq!(*line, 2);
                assert!(message.contains("Unterminated block comment"));
            }
            other => panic!("expected Lex error, got {:?}", other),
        }
    }

    #[test]
    fn unterminated_string_reports_opening_line() {
        let results: Vec<_> = Scanner::new(b"ok\n\"left\nopen").collect();

        let errors: Vec<&LoxError> = results.iter().filter_map(|r| r.as_ref().err()).collect();

        assert_eq!(errors.len(), 1);

        match errors[0] {
            LoxError::Lex { line, message } => {
                assert_eq!(*line, 2);
                assert!(message.contains("Unterminated string"));
            }
            other => panic!("expected Lex error, got {:?}", other),
        }
    }

    #[test]
    fn unexpected_characters_do_not_stop_the_scan() {
        let results: Vec<_> = Scanner::new(b",.$(#").collect();

        // COMMA, DOT, error for '$', LEFT_PAREN, error for '#', EOF.
        assert_eq!(results.len(), 6);

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2);

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character"),
                "unexpected message: {}",
                err
            );
        }

        let kinds: Vec<TokenType> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|t| t.token_type.clone())
            .collect();

        assert_eq!(
            kinds,
            vec![
                TokenType::COMMA,
                TokenType::DOT,
                TokenType::LEFT_PAREN,
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn tokens_display_with_their_literals() {
        let tokens: Vec<Token> = Scanner::new(b"var x = 12.5; 7 \"hi\"")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens[0].to_string(), "VAR var null");
        assert_eq!(tokens[3].to_string(), "NUMBER 12.5 12.5");
        assert_eq!(tokens[5].to_string(), "NUMBER 7 7.0");
        assert_eq!(tokens[6].to_string(), "STRING \"hi\" hi");
    }

    #[test]
    fn empty_input_lexes_to_eof() {
        let tokens: Vec<Token> = Scanner::new(b"").filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::EOF);
        assert_eq!(tokens[0].line, 1);
    }

    #[test]
    fn eof_carries_last_line_of_input() {
        let tokens: Vec<Token> = Scanner::new(b"a\nb\nc").filter_map(Result::ok).collect();

        assert_eq!(tokens.last().map(|t| t.line), Some(3));
    }

    #[test]
    fn lexemes_are_exact_source_slices() {
        let source = "var answer = 6 * 7; // check\nprint answer <= 42;";

        for token in Scanner::new(source.as_bytes()).filter_map(Result::ok) {
            if token.token_type == TokenType::EOF {
                continue;
            }

            assert!(
                source.contains(&token.lexeme),
                "lexeme '{}' not found in source",
                token.lexeme
            );
        }
    }
}
