use quadtty::compiler;

#[test]
fn test_full_program_compiles() {
    let source = r#"
    int add(int a, int b) {
        return a + b;
    }

    int x;
    int i;
    x = 0;
    i = 0;
    while (i < 10) {
        x = x + i * 2;
        i = i + 1;
    }
    if (x > 50) {
        x = add(x, 1);
    } else {
        x = 0;
    }
    "#;

    let outcome = compiler::compile(source);
    assert!(outcome.success, "message: {}", outcome.message);

    let quads = outcome.quadruples.join("\n");
    // Function bracketing
    assert!(quads.contains("(FuncStart _ _ add)"));
    assert!(quads.contains("(FuncDef int 2 add)"));
    assert!(quads.contains("(FuncEnd _ _ add)"));
    // Loop structure
    assert!(quads.contains("(wh _ _ _)"));
    assert!(quads.contains("(we _ _ _)"));
    // Call from the if branch
    assert!(quads.contains("(call add 2"));

    let asm = outcome.assembly.join("\n");
    assert!(asm.starts_with(".MODEL SMALL"));
    assert!(asm.contains("ADD PROC"));
    assert!(asm.contains("CALL ADD"));
    assert!(asm.ends_with("END MAIN"));

    let symbols = outcome.symbol_table.join("\n");
    assert!(symbols.contains("Symbols of function 'add':"));
    assert!(symbols.contains("Global symbols:"));
}

#[test]
fn test_category_tables_populated() {
    let outcome = compiler::compile("int x; x = x + 1;");
    assert!(outcome.success);

    assert_eq!(outcome.keyword_table.len(), 1); // int
    assert_eq!(outcome.identifier_table.len(), 1); // x
    assert_eq!(outcome.constant_table.len(), 1); // 1
    assert_eq!(outcome.operator_table.len(), 2); // = +
    assert_eq!(outcome.separator_table.len(), 1); // ;

    // Token order survives in the standard sequence.
    assert_eq!(outcome.standard_sequence[0], "(KEYWORD, int)");
    assert_eq!(outcome.standard_sequence[1], "(IDENTIFIER, x)");
}

#[test]
fn test_arrays_end_to_end() {
    let outcome = compiler::compile("int a[10]; a[2] = 7; int y; y = a[2] + 1;");
    assert!(outcome.success, "message: {}", outcome.message);

    let quads = outcome.quadruples.join("\n");
    assert!(quads.contains("(ARRAY_DECL a 10 _)"));
    assert!(quads.contains("(= 7 _ a[2])"));

    let asm = outcome.assembly.join("\n");
    assert!(asm.contains("a DW 10 DUP(?)"));

    let symbols = outcome.symbol_table.join("\n");
    assert!(symbols.contains("Array table:"));
}

#[test]
fn test_syntax_error_reports_position() {
    let outcome = compiler::compile("int x; x = * 3;");
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("syntax error:"));
    // The marker splits the source at the offending token.
    let parts: Vec<&str> = outcome.message.splitn(2, '\n').collect();
    assert_eq!(parts.len(), 2);
    assert!(outcome.message.contains("^^^^"));
    // Category tables from the successful lex stage are still delivered.
    assert!(!outcome.keyword_table.is_empty());
}

#[test]
fn test_optimizations_visible_in_quadruples() {
    let outcome = compiler::compile("int x; int y; x = 2 * 3 + 4; y = a + b; x = a + b;");
    assert!(outcome.success);

    let quads = outcome.quadruples.join("\n");
    // Constant folding: 2*3+4 collapses to a single assignment of 10.
    assert!(quads.contains("(= 10 _ x)"));
    // Common subexpression: a+b computed once.
    let additions = outcome
        .quadruples
        .iter()
        .filter(|q| q.starts_with("(+ a b"))
        .count();
    assert_eq!(additions, 1);
}

#[test]
fn test_sections_match_registry_ids() {
    let outcome = compiler::compile("int x;");
    let sections = outcome.sections();
    let ids: Vec<&str> = sections.iter().map(|(id, _)| *id).collect();
    assert_eq!(
        ids,
        vec![
            "opt_area",
            "asm",
            "tokens",
            "symbol_table",
            "keyword_table",
            "identifier_table",
            "constant_table",
            "operator_table",
            "separator_table",
        ]
    );
}
