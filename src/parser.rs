//! Parser for the `.mt` program text format, built on `pest`. The format is
//! line oriented: `name`, `tape`, and optional `head` sections, followed by a
//! `rules` section of state blocks (see `grammar.pest`).

use crate::{
    analyzer::analyze,
    types::{
        Action, MachineError, Movement, Program, RuleEntry, State, Symbol, HALT_STATE_NAME,
        INPUT_BLANK_SYMBOL,
    },
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the program grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct ProgramParser;

/// Parses a program definition into a [`Program`].
///
/// The parsed program is validated with [`analyze`] before being returned,
/// so a successful parse is ready to execute (up to rule-table ambiguity,
/// which surfaces when the transition table is built).
///
/// # Errors
///
/// Returns [`MachineError::ParseError`] for syntax errors and
/// [`MachineError::ValidationError`] for analysis findings.
pub fn parse(input: &str) -> Result<Program, MachineError> {
    let root = ProgramParser::parse(Rule::program, input.trim())
        .map_err(|e| MachineError::ParseError(e.into()))?
        .next()
        .unwrap();

    let program = parse_program(root)?;

    analyze(&program)?;

    Ok(program)
}

/// Extracts the program's name, tape, head, rules, and initial state from
/// the top-level parse tree, checking section uniqueness and presence.
fn parse_program(pair: Pair<Rule>) -> Result<Program, MachineError> {
    let mut name: Option<String> = None;
    let mut tape: Option<Vec<Symbol>> = None;
    let mut head: Option<usize> = None;
    let mut rules: Option<Vec<RuleEntry>> = None;
    let mut initial_state: Option<State> = None;
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_section(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(parse_inner_string(p)),
            Rule::tape => tape = Some(parse_tape(p)),
            Rule::head => head = Some(parse_head(p)?),
            Rule::rules => rules = Some(parse_transitions(p, &mut initial_state)?),
            _ => {} // Skip other rules
        }
    }

    let name = check_required_section(name, "name")?;
    let tape = check_required_section(tape, "tape")?;
    let rules = check_required_section(rules, "rules")?;
    let initial_state = check_required_section(initial_state, "rules")?;
    let head = head.unwrap_or(0);

    Ok(Program {
        name,
        initial_state,
        tape,
        head,
        rules,
    })
}

/// Parses the tape section into its symbols.
fn parse_tape(pair: Pair<Rule>) -> Vec<Symbol> {
    let mut symbols = Vec::new();

    // Rule: tape > symbols > [symbol]
    for symbols_pair in pair.into_inner() {
        if symbols_pair.as_rule() == Rule::symbols {
            for symbol_pair in symbols_pair.into_inner() {
                symbols.push(parse_symbol(symbol_pair.as_str()));
            }
        }
    }

    symbols
}

/// Parses the head section into a head index.
fn parse_head(pair: Pair<Rule>) -> Result<usize, MachineError> {
    let index_pair = pair.into_inner().next().unwrap();
    let span = index_pair.as_span();

    index_pair
        .as_str()
        .parse::<usize>()
        .map_err(|_| parse_error("Invalid head index", span))
}

/// Parses the rules section into rule entries and records the first state
/// block as the initial state. Duplicate state blocks are rejected.
fn parse_transitions(
    pair: Pair<Rule>,
    initial_state: &mut Option<State>,
) -> Result<Vec<RuleEntry>, MachineError> {
    let mut entries = Vec::new();
    let mut seen_states = HashSet::new();

    for transition_pair in pair.into_inner() {
        let span = transition_pair.as_span();
        let (state_name, state, actions) = parse_transition(transition_pair)?;

        // Set first state as initial state
        if initial_state.is_none() {
            *initial_state = Some(state.clone());
        }

        // Prevent duplicated state blocks
        if !seen_states.insert(state_name.clone()) {
            return Err(parse_error(
                &format!("Duplicate state block: {state_name}"),
                span,
            ));
        }

        for (read, action) in actions {
            entries.push(RuleEntry {
                state: state.clone(),
                read,
                action,
            });
        }
    }

    Ok(entries)
}

/// Parses one state block into its name, state, and actions.
fn parse_transition(
    pair: Pair<Rule>,
) -> Result<(String, State, Vec<(Symbol, Action)>), MachineError> {
    let mut pairs = pair.into_inner();
    let state_name = pairs.next().unwrap().as_str().to_string();
    let state = parse_state(&state_name);
    let mut actions = Vec::new();

    for p in pairs {
        if p.as_rule() == Rule::action {
            actions.push(parse_action(p)?);
        }
    }

    Ok((state_name, state, actions))
}

/// Parses one action line: the read symbol, the write symbol (defaults to
/// the read symbol when omitted), the movement, and the next state.
fn parse_action(pair: Pair<Rule>) -> Result<(Symbol, Action), MachineError> {
    let mut pairs = pair.into_inner();
    let read = parse_symbol(pairs.next().unwrap().as_str());

    // If `write` is omitted, we'll make `write` equal to `read`
    let write = match pairs.peek().unwrap().as_rule() {
        Rule::direction => read,
        _ => parse_symbol(pairs.next().unwrap().as_str()),
    };

    let movement = parse_direction(pairs.next().unwrap())?;
    let next_state = parse_state(pairs.next().unwrap().as_str());

    Ok((
        read,
        Action {
            write,
            movement,
            next_state,
        },
    ))
}

/// Parses a direction token. Supports `<` or `L` for Left and `>` or `R`
/// for Right.
fn parse_direction(pair: Pair<Rule>) -> Result<Movement, MachineError> {
    let span = pair.as_span();
    match pair.as_str() {
        "<" | "L" => Ok(Movement::Left),
        ">" | "R" => Ok(Movement::Right),
        _ => Err(parse_error(
            &format!("Unsupported direction: {}", pair.as_str()),
            span,
        )),
    }
}

/// Parses a single-character symbol, handling quoted and unquoted forms.
/// The input blank character maps to [`Symbol::Blank`].
fn parse_symbol(input: &str) -> Symbol {
    let c = input
        .trim_matches('\'')
        .chars()
        .next()
        .unwrap_or(INPUT_BLANK_SYMBOL);

    if c == INPUT_BLANK_SYMBOL {
        Symbol::Blank
    } else {
        Symbol::Glyph(c)
    }
}

/// Parses a state name. The reserved name `halt` maps to [`State::Halt`].
fn parse_state(name: &str) -> State {
    if name == HALT_STATE_NAME {
        State::Halt
    } else {
        State::named(name)
    }
}

/// Extracts the inner string content from a `Pair`.
fn parse_inner_string(pair: Pair<Rule>) -> String {
    pair.into_inner().next().unwrap().as_str().trim().into()
}

/// Creates a `MachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> MachineError {
    MachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks that a top-level section appears at most once.
fn check_unique_section(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), MachineError> {
    if !matches!(rule, Rule::name | Rule::tape | Rule::head | Rule::rules) {
        return Ok(());
    }

    if !seen.insert(rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks that a required section is present.
fn check_required_section<T>(value: Option<T>, name: &str) -> Result<T, MachineError> {
    value.ok_or_else(|| MachineError::ValidationError(format!("Missing '{name}' section")))
}
