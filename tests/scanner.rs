mod scanner_tests {
    use triangle_core::Scanner;
    use triangle_core::common::position::Position;
    use triangle_core::frontend::scanner::CharSource;

    #[test]
    fn test_scanner_initialization() {
        let source = "let var x : integer in x := 5";
        let scanner = Scanner::new(source);

        assert!(!scanner.is_at_end());
        assert_eq!(scanner.current(), Some('l'));
        assert_eq!(scanner.position(), Position::new(1, 1));
    }

    #[test]
    fn test_scanner_line_tracking() {
        let mut scanner = Scanner::new("ab\ncd");

        scanner.move_next();
        scanner.move_next();
        assert_eq!(scanner.position(), Position::new(1, 3));
        assert_eq!(scanner.current(), Some('\n'));

        scanner.move_next();
        assert_eq!(scanner.position(), Position::new(2, 1));
        assert_eq!(scanner.current(), Some('c'));
    }

    #[test]
    fn test_skip_rest_of_line() {
        let mut scanner = Scanner::new("! a comment\nx");

        scanner.skip_rest_of_line();
        assert_eq!(scanner.current(), Some('x'));
        assert_eq!(scanner.position(), Position::new(2, 1));
    }

    #[test]
    fn test_closed_source_yields_nothing() {
        let mut scanner = Scanner::new("abc");
        scanner.close();

        assert_eq!(scanner.current(), None);
        assert!(scanner.is_at_end());
        scanner.move_next();
        assert_eq!(scanner.current(), None);
    }
}
