//! Demo program for the optline parser.
//!
//! Pure glue: registers a handful of options against a shared session
//! state, hands `std::env::args` to [`Parser::run`], and prints whatever
//! the callbacks produce. Run it with `?` or `help` to see the registered
//! surface.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use optline_core::{OptionSpec, ParamType, Parser, RunError};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// State the option callbacks share across one invocation.
#[derive(Default)]
struct Session {
    user: RefCell<Option<String>>,
    password: RefCell<Option<String>>,
    dump_summary: Cell<bool>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), RunError> {
    let session = Rc::new(Session::default());
    let mut parser = build_parser(Rc::clone(&session));

    parser.run(std::env::args().skip(1))?;

    if session.dump_summary.get() {
        let summary = parser.summary();
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("error: summary serialization failed: {err}"),
        }
    }
    Ok(())
}

fn build_parser(session: Rc<Session>) -> Parser {
    let mut parser = Parser::new(
        "optline-demo",
        VERSION,
        "Keyword-dispatch parsing demo: options are plain keywords followed \
         by their typed parameters",
    );

    parser
        .add_option(
            OptionSpec::new("add")
                .with_description("Add two integers (bare hex accepted)")
                .with_params(&[ParamType::I32, ParamType::I32]),
            |values| {
                let a = values[0].as_i64().unwrap_or_default();
                let b = values[1].as_i64().unwrap_or_default();
                println!("{a} + {b} = {}", a + b);
            },
        )
        .expect("add registers");

    parser
        .add_option(
            OptionSpec::new("avg")
                .with_description("Average any number of floats")
                .variadic(ParamType::F64),
            |values| {
                if values.is_empty() {
                    println!("avg: no values");
                    return;
                }
                let sum: f64 = values.iter().filter_map(|v| v.as_f64()).sum();
                println!("avg = {}", sum / values.len() as f64);
            },
        )
        .expect("avg registers");

    parser
        .add_option(
            OptionSpec::new("greet")
                .with_description("Greet someone (quote multi-word names)")
                .with_params(&[ParamType::Str]),
            |values| {
                println!("hello, {}!", values[0].as_str().unwrap_or_default());
            },
        )
        .expect("greet registers");

    parser
        .add_option(
            OptionSpec::new("initial")
                .with_description("Echo a single character")
                .with_params(&[ParamType::Char]),
            |values| {
                println!("initial: {}", values[0].as_char().unwrap_or('?'));
            },
        )
        .expect("initial registers");

    let state = Rc::clone(&session);
    parser
        .add_option(
            OptionSpec::new("user")
                .with_description("Set the account name")
                .with_params(&[ParamType::Str]),
            move |values| {
                *state.user.borrow_mut() = values[0].as_str().map(String::from);
            },
        )
        .expect("user registers");

    let state = Rc::clone(&session);
    parser
        .add_option(
            OptionSpec::new("pass")
                .with_description("Set the account password")
                .with_params(&[ParamType::Str]),
            move |values| {
                *state.password.borrow_mut() = values[0].as_str().map(String::from);
            },
        )
        .expect("pass registers");

    let state = Rc::clone(&session);
    parser
        .add_option(
            OptionSpec::new("login").with_description("Log in with user and pass"),
            move |_| {
                let user = state.user.borrow();
                println!("logged in as {}", user.as_deref().unwrap_or("<unset>"));
            },
        )
        .expect("login registers");

    parser
        .add_option(
            OptionSpec::new("anon").with_description("Browse without an account"),
            |_| println!("browsing anonymously"),
        )
        .expect("anon registers");

    parser
        .add_option(
            OptionSpec::new("reset")
                .with_description("Factory reset; must be given alone"),
            |_| println!("reset complete"),
        )
        .expect("reset registers");

    let state = Rc::clone(&session);
    parser
        .add_option(
            OptionSpec::new("schema")
                .with_description("Dump the registered options as JSON"),
            move |_| state.dump_summary.set(true),
        )
        .expect("schema registers");

    parser
        .add_requirement("login", &["user", "pass"])
        .expect("login dependencies declare");
    parser
        .add_conflict("anon", &["user", "pass", "login"])
        .expect("anon conflicts declare");
    parser
        .make_exclusive("reset")
        .expect("reset becomes exclusive");

    parser
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_parser_registers_full_surface() {
        let parser = build_parser(Rc::new(Session::default()));
        for name in [
            "add", "avg", "greet", "initial", "user", "pass", "login", "anon", "reset", "schema",
        ] {
            assert!(parser.contains(name), "missing option {name}");
        }
    }

    #[test]
    fn test_login_requires_both_credentials() {
        let session = Rc::new(Session::default());
        let mut parser = build_parser(Rc::clone(&session));

        let err = parser.run(["login"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("pass"), "message: {message}");
        assert!(message.contains("user"), "message: {message}");

        parser
            .run(["user", "ada", "pass", "hunter2", "login"])
            .expect("full credential set logs in");
        assert_eq!(session.user.borrow().as_deref(), Some("ada"));
    }

    #[test]
    fn test_schema_option_sets_dump_flag() {
        let session = Rc::new(Session::default());
        let mut parser = build_parser(Rc::clone(&session));

        assert!(!session.dump_summary.get());
        parser.run(["schema"]).expect("schema runs");
        assert!(session.dump_summary.get());
    }
}
