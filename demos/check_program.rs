//! Check a few small programs and print what each phase reports.

use sigil_front::{Error, check_str, format_lex_errors, format_syntax_errors, format_tokens};

fn report(name: &str, source: &str) {
    println!("== {name}");
    match check_str(source) {
        Ok(tokens) => {
            print!("{}", format_tokens(&tokens));
            println!("OK: {} token(s)", tokens.len());
        }
        Err(Error::Lex(errors)) => {
            println!("Lexical errors:");
            print!("{}", format_lex_errors(&errors));
        }
        Err(Error::Syntax(errors)) => {
            println!("Syntax errors:");
            print!("{}", format_syntax_errors(&errors));
        }
    }
    println!();
}

fn main() {
    // Well-formed
    report(
        "countdown",
        "int @n = 3;\n\
         while (@n > 0):\n\
         start\n\
         \tprint(@n);\n\
         \t@n = @n - 1;\n\
         end",
    );

    // Bare word without a sigil
    report("missing sigil", "count = 1;");

    // Block never closed
    report("missing end", "if (@x > 1): start print(@x);");
}
