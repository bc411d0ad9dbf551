//! End-to-end scenarios across the three drivers.

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::builder::Builder;
use crate::byteclass::ByteClass;
use crate::debug::{DebugConfig, DebugFlags};
use crate::error::ErrorKind;

/// Start -> D1 -> D2 -> D3, one digit each, accepting exactly three digits.
fn three_digits() -> Automaton {
    Builder::new("three_digits")
        .transition("START", "D1", ByteClass::digit())
        .transition("D1", "D2", ByteClass::digit())
        .transition("D2", "D3", ByteClass::digit())
        .start_state("START")
        .accept_state("D3")
        .build()
}

/// "cat" | "catch" with the shared prefix modeled as alternative branches,
/// so the greedy driver commits to the "cat" branch and cannot recover.
fn cat_or_catch() -> Automaton {
    Builder::new("cat_or_catch")
        .transition("START", "C", ByteClass::byte(b'c'))
        .transition("C", "CA", ByteClass::byte(b'a'))
        .transition("CA", "CAT", ByteClass::byte(b't'))
        .transition("START", "C2", ByteClass::byte(b'c'))
        .transition("C2", "CA2", ByteClass::byte(b'a'))
        .transition("CA2", "CAT2", ByteClass::byte(b't'))
        .transition("CAT2", "CATC", ByteClass::byte(b'c'))
        .transition("CATC", "CATCH", ByteClass::byte(b'h'))
        .start_state("START")
        .accept_state("CAT")
        .accept_state("CATCH")
        .build()
}

/// Digits loop with an epsilon into a separate accept state.
fn digits_with_suffix() -> Automaton {
    Builder::new("digits")
        .transition("START", "DIGITS", ByteClass::digit())
        .transition("DIGITS", "DIGITS", ByteClass::digit())
        .epsilon("DIGITS", "ACCEPT")
        .start_state("START")
        .accept_state("DIGITS")
        .accept_state("ACCEPT")
        .build()
}

// ----------------------------------------------------------------------
// Greedy driver
// ----------------------------------------------------------------------

#[test]
fn test_three_digits_accepts_exactly_three() {
    let mut fsa = three_digits();
    assert!(fsa.validate(b"123"));
    assert!(fsa.validate(b"000"));
    assert!(fsa.validate(b"999"));
    assert!(!fsa.validate(b"12"));
    assert!(!fsa.validate(b"1234"));
    assert!(!fsa.validate(b"12a"));
    assert!(!fsa.validate(b""));
}

#[test]
fn test_three_digits_error_positions_and_kinds() {
    let mut fsa = three_digits();

    assert!(!fsa.validate(b"12"));
    let err = fsa.last_error().expect("error recorded");
    assert_eq!(err.kind, ErrorKind::NotInAcceptState);
    assert_eq!(err.position, 2);

    assert!(!fsa.validate(b"1234"));
    let err = fsa.last_error().expect("error recorded");
    assert_eq!(err.kind, ErrorKind::NoMatchingTransition);
    assert_eq!(err.position, 3);
    assert_eq!(err.byte, b'4');

    assert!(!fsa.validate(b"12a"));
    let err = fsa.last_error().expect("error recorded");
    assert_eq!(err.kind, ErrorKind::NoMatchingTransition);
    assert_eq!(err.position, 2);
    assert_eq!(err.byte, b'a');
}

#[test]
fn test_validate_without_start_state() {
    let mut fsa = Automaton::with_name("unbound");
    let a = fsa.add_state("A");
    fsa.add_accept_state(&a);
    assert!(!fsa.validate(b"x"));
    assert_eq!(fsa.last_error().unwrap().kind, ErrorKind::NoStartState);
}

#[test]
fn test_greedy_is_deterministic_across_runs() {
    let mut fsa = cat_or_catch();
    let first = fsa.validate(b"catch");
    let first_state = fsa.current_state().clone();
    for _ in 0..3 {
        assert_eq!(fsa.validate(b"catch"), first);
        assert_eq!(*fsa.current_state(), first_state);
    }
}

#[test]
fn test_priority_selects_highest_then_insertion_order() {
    // Two overlapping 'x' edges: the high-priority one wins.
    let mut fsa = Builder::new("priorities")
        .transition_with_priority("START", "A", ByteClass::byte(b'x'), Transition::PRIORITY_HIGH)
        .transition_with_priority("START", "B", ByteClass::byte(b'x'), Transition::PRIORITY_LOW)
        .transition("A", "ACCEPT", ByteClass::byte(b'y'))
        .transition("B", "ACCEPT", ByteClass::byte(b'z'))
        .start_state("START")
        .accept_state("ACCEPT")
        .build();

    assert!(fsa.validate(b"xy"));
    assert!(!fsa.validate(b"xz"));

    // Equal priority: insertion order decides.
    let mut tied = Builder::new("tied")
        .transition("START", "FIRST", ByteClass::byte(b'x'))
        .transition("START", "SECOND", ByteClass::byte(b'x'))
        .transition("FIRST", "ACCEPT", ByteClass::byte(b'1'))
        .transition("SECOND", "ACCEPT", ByteClass::byte(b'2'))
        .start_state("START")
        .accept_state("ACCEPT")
        .build();

    assert!(tied.validate(b"x1"));
    assert!(!tied.validate(b"x2"));
}

#[test]
fn test_epsilon_cycle_terminates() {
    let mut fsa = Builder::new("eps_cycle")
        .epsilon("A", "B")
        .epsilon("B", "A")
        .start_state("A")
        .accept_state("B")
        .build();
    // The closure visits B once and stops; no infinite loop.
    assert!(fsa.validate(b""));
    assert_eq!(*fsa.current_state(), fsa.states()[1]);
}

#[test]
fn test_epsilon_chain_runs_to_the_end() {
    let mut fsa = Builder::new("eps_chain")
        .transition("START", "A", ByteClass::byte(b'x'))
        .epsilon("A", "B")
        .epsilon("B", "C")
        .start_state("START")
        .accept_state("C")
        .build();
    assert!(fsa.validate(b"x"));
}

#[test]
fn test_verbose_errors_attach_context() {
    let mut fsa = three_digits();
    fsa.debug_config_mut().flags = DebugFlags::VERBOSE_ERRORS;
    assert!(!fsa.validate(b"12a45"));
    let err = fsa.last_error().unwrap();
    let ctx = err.context.as_deref().expect("context attached");
    assert!(ctx.contains("12a"), "context {ctx:?} should include the failure area");
}

#[test]
fn test_trace_records_each_committed_step() {
    let mut fsa = digits_with_suffix();
    fsa.set_debug_config(DebugConfig::with_flags(DebugFlags::TRACE_TRANSITIONS));
    assert!(fsa.validate(b"12"));

    let trace = fsa.trace();
    // Two byte steps plus the closing epsilon.
    assert_eq!(trace.len(), 3);
    assert_eq!(trace[0].byte, b'1');
    assert_eq!(trace[1].byte, b'2');
    assert_eq!(trace[2].byte, 0);
    assert_eq!(trace[0].step, 0);
    assert_eq!(trace[2].step, 2);
    assert_eq!(trace[2].to.name(), Some("ACCEPT"));

    fsa.clear_trace();
    assert!(fsa.trace().is_empty());
}

// ----------------------------------------------------------------------
// Metrics (scenario E3)
// ----------------------------------------------------------------------

#[test]
fn test_metrics_for_digit_run() {
    let mut fsa = digits_with_suffix();
    fsa.set_debug_config(DebugConfig::with_flags(DebugFlags::COLLECT_METRICS));
    assert!(fsa.validate(b"12345"));

    let metrics = fsa.metrics();
    assert_eq!(metrics.transitions_taken, 5);
    assert_eq!(metrics.epsilon_transitions, 1);
    assert_eq!(metrics.characters_processed, 5);
    // START->DIGITS is the only consuming state change.
    assert_eq!(metrics.states_entered, 1);
}

#[test]
fn test_streamed_digits_reach_complete() {
    let mut fsa = digits_with_suffix();
    assert_eq!(fsa.feed_all(b"12345"), StreamStatus::Complete);
    assert_eq!(fsa.end_of_stream(), StreamStatus::Complete);
}

#[test]
fn test_metrics_cleared_between_runs() {
    let mut fsa = digits_with_suffix();
    fsa.set_debug_config(DebugConfig::with_flags(DebugFlags::COLLECT_METRICS));
    assert!(fsa.validate(b"123"));
    assert!(fsa.validate(b"7"));
    assert_eq!(fsa.metrics().transitions_taken, 1);
    assert_eq!(fsa.metrics().characters_processed, 1);
}

#[test]
fn test_metrics_do_not_accumulate_when_disabled() {
    let mut fsa = digits_with_suffix();
    assert!(fsa.validate(b"123"));
    assert_eq!(fsa.metrics().transitions_taken, 0);
}

// ----------------------------------------------------------------------
// Streaming driver
// ----------------------------------------------------------------------

#[test]
fn test_stream_status_transitions() {
    let mut fsa = three_digits();
    assert_eq!(fsa.stream_status(), StreamStatus::Ready);
    assert_eq!(fsa.feed(b'1'), StreamStatus::WaitingForInput);
    assert!(fsa.needs_more_input());
    assert_eq!(fsa.feed(b'2'), StreamStatus::WaitingForInput);
    assert_eq!(fsa.feed(b'3'), StreamStatus::Complete);
    assert!(fsa.is_stream_complete());
    assert_eq!(fsa.end_of_stream(), StreamStatus::Complete);
}

#[test]
fn test_stream_complete_is_eager_and_revocable() {
    // One-or-more digits: accept is entered on the first byte and stays.
    let mut fsa = Builder::new("digits_then_letter")
        .transition("START", "NUM", ByteClass::digit())
        .transition("NUM", "NUM", ByteClass::digit())
        .transition("NUM", "TAIL", ByteClass::alpha())
        .transition("TAIL", "NUM", ByteClass::digit())
        .start_state("START")
        .accept_state("NUM")
        .build();

    assert_eq!(fsa.feed(b'1'), StreamStatus::Complete);
    // A letter moves us off the accept state again.
    assert_eq!(fsa.feed(b'x'), StreamStatus::WaitingForInput);
    assert_eq!(fsa.feed(b'2'), StreamStatus::Complete);
}

#[test]
fn test_stream_error_is_sticky() {
    let mut fsa = three_digits();
    assert_eq!(fsa.feed(b'a'), StreamStatus::Error);
    let position = fsa.last_error().unwrap().position;
    // Feeding after an error changes nothing.
    assert_eq!(fsa.feed(b'1'), StreamStatus::Error);
    assert_eq!(fsa.last_error().unwrap().position, position);
    assert_eq!(fsa.end_of_stream(), StreamStatus::Error);
}

#[test]
fn test_end_of_stream_before_feed() {
    let mut fsa = three_digits();
    assert_eq!(fsa.end_of_stream(), StreamStatus::Error);
    assert_eq!(
        fsa.last_error().unwrap().kind,
        ErrorKind::UnexpectedEndOfInput
    );
}

#[test]
fn test_end_of_stream_not_in_accept_state() {
    let mut fsa = three_digits();
    fsa.feed(b'1');
    assert_eq!(fsa.end_of_stream(), StreamStatus::Error);
    assert_eq!(fsa.last_error().unwrap().kind, ErrorKind::NotInAcceptState);
}

#[test]
fn test_feed_all_equals_single_byte_feeds() {
    let mut chunked = three_digits();
    let mut single = three_digits();

    assert_eq!(chunked.feed_all(b"123"), StreamStatus::Complete);
    for &b in b"123" {
        single.feed(b);
    }
    assert_eq!(single.stream_status(), StreamStatus::Complete);
    assert_eq!(chunked.end_of_stream(), single.end_of_stream());

    // A chunk stops at the first error.
    let mut failing = three_digits();
    assert_eq!(failing.feed_all(b"1a3"), StreamStatus::Error);
    assert_eq!(failing.last_error().unwrap().position, 1);
}

#[test]
fn test_streaming_equals_one_shot_validation() {
    let inputs: &[&[u8]] = &[b"", b"1", b"12", b"123", b"1234", b"12a", b"abc"];
    for input in inputs {
        let mut whole = three_digits();
        let mut streamed = three_digits();

        let expected = whole.validate(input);
        for &b in *input {
            if streamed.feed(b) == StreamStatus::Error {
                break;
            }
        }
        let streamed_ok = streamed.stream_status() != StreamStatus::Error
            && streamed.end_of_stream() == StreamStatus::Complete;
        assert_eq!(streamed_ok, expected, "disagreement on {input:?}");
    }
}

#[test]
fn test_reset_stream_keeps_captures_for_inspection() {
    let mut fsa = capture_digits();
    fsa.feed_all(b"123");
    assert_eq!(fsa.end_of_stream(), StreamStatus::Complete);

    fsa.reset_stream();
    assert_eq!(fsa.stream_status(), StreamStatus::Ready);
    // Captures survive the stream reset for post-run inspection.
    assert!(fsa.has_capture("num"));

    // A full reset clears them.
    fsa.reset();
    assert!(!fsa.has_capture("num"));
}

#[test]
fn test_large_stream() {
    let mut fsa = Builder::new("many_digits")
        .transition("START", "NUM", ByteClass::digit())
        .transition("NUM", "NUM", ByteClass::digit())
        .start_state("START")
        .accept_state("NUM")
        .build();

    for _ in 0..4096 {
        assert_eq!(fsa.feed(b'7'), StreamStatus::Complete);
    }
    assert_eq!(fsa.end_of_stream(), StreamStatus::Complete);
}

// ----------------------------------------------------------------------
// Backtracking driver (scenarios E2, E5, E6)
// ----------------------------------------------------------------------

#[test]
fn test_cat_or_catch_greedy_vs_backtracking() {
    let mut fsa = cat_or_catch();

    assert!(fsa.validate(b"cat"));
    // Greedy commits to the "cat" branch and dies at the fourth byte.
    assert!(!fsa.validate(b"catch"));
    assert_eq!(
        fsa.last_error().unwrap().kind,
        ErrorKind::NoMatchingTransition
    );

    assert!(fsa.validate_with_backtracking(b"catch"));
    assert!(fsa.backtrack_stats().paths_explored > 0);
    assert!(fsa.backtrack_stats().backtracks_performed >= 1);

    assert!(fsa.validate_with_backtracking(b"cat"));
}

#[test]
fn test_backtracking_accepts_everything_greedy_does() {
    let inputs: &[&[u8]] = &[b"cat", b"catch", b"ca", b"dog", b""];
    for input in inputs {
        let mut greedy = cat_or_catch();
        let mut searching = cat_or_catch();
        if greedy.validate(input) {
            assert!(
                searching.validate_with_backtracking(input),
                "backtracking must accept {input:?}"
            );
        }
    }
}

#[test]
fn test_no_choice_points_on_a_linear_graph() {
    let mut fsa = three_digits();
    assert!(fsa.validate_with_backtracking(b"123"));
    let stats = fsa.backtrack_stats();
    assert_eq!(stats.choice_points_created, 0);
    assert_eq!(stats.backtracks_performed, 0);
    assert_eq!(stats.max_stack_depth, 0);
    assert_eq!(stats.paths_explored, 3);
}

#[test]
fn test_marked_choice_point_records_single_alternative() {
    let mut fsa = Builder::new("marked")
        .transition("START", "MID", ByteClass::digit())
        .transition("MID", "ACCEPT", ByteClass::alpha())
        .mark_choice_point("MID")
        .start_state("START")
        .accept_state("ACCEPT")
        .build();

    assert!(fsa.validate_with_backtracking(b"1a"));
    // MID is marked, so its single viable transition still records a
    // choice point.
    assert_eq!(fsa.backtrack_stats().choice_points_created, 1);
}

#[test]
fn test_backtracking_failure_exhausts_alternatives() {
    let mut fsa = Builder::new("all_fail")
        .transition("START", "P1", ByteClass::byte(b'a'))
        .transition("START", "P2", ByteClass::byte(b'a'))
        .transition("P1", "ACCEPT", ByteClass::byte(b'b'))
        .transition("P2", "ACCEPT", ByteClass::byte(b'c'))
        .start_state("START")
        .accept_state("ACCEPT")
        .build();

    assert!(!fsa.validate_with_backtracking(b"ax"));
    let err = fsa.last_error().unwrap();
    assert_eq!(err.kind, ErrorKind::NoMatchingTransition);
    assert!(!err.attempted.is_empty(), "attempted states recorded");
    assert!(fsa.backtrack_stats().backtracks_performed >= 1);
}

#[test]
fn test_end_of_input_backtracking() {
    // Both branches consume "xz" fully; only the second ends accepting.
    let mut fsa = Builder::new("late_choice")
        .transition_with_priority("START", "A", ByteClass::byte(b'x'), Transition::PRIORITY_HIGH)
        .transition_with_priority("START", "B", ByteClass::byte(b'x'), Transition::PRIORITY_LOW)
        .transition("A", "DEAD", ByteClass::byte(b'z'))
        .transition("B", "ACCEPT", ByteClass::byte(b'z'))
        .start_state("START")
        .accept_state("ACCEPT")
        .build();

    assert!(!fsa.validate(b"xz"));
    assert!(fsa.validate_with_backtracking(b"xz"));
    assert!(fsa.backtrack_stats().backtracks_performed >= 1);
}

#[test]
fn test_nested_backtracking_depth() {
    let mut fsa = Builder::new("nested")
        .transition("START", "A1", ByteClass::byte(b'a'))
        .transition("START", "A2", ByteClass::byte(b'a'))
        .transition("A1", "B1", ByteClass::byte(b'b'))
        .transition("A1", "B2", ByteClass::byte(b'b'))
        .transition("A2", "B1", ByteClass::byte(b'b'))
        .transition("A2", "B2", ByteClass::byte(b'b'))
        .transition("B2", "ACCEPT", ByteClass::byte(b'c'))
        .start_state("START")
        .accept_state("ACCEPT")
        .build();

    assert!(fsa.validate_with_backtracking(b"abc"));
    let stats = fsa.backtrack_stats();
    assert!(stats.choice_points_created > 0);
    assert!(stats.max_stack_depth > 0);
}

#[test]
fn test_max_depth_cap_bounds_the_stack() {
    let mut fsa = Builder::new("deep")
        .transition("START", "L1", ByteClass::byte(b'a'))
        .transition("START", "L1", ByteClass::byte(b'a'))
        .transition("L1", "L2", ByteClass::byte(b'b'))
        .transition("L1", "L2", ByteClass::byte(b'b'))
        .transition("L2", "L3", ByteClass::byte(b'c'))
        .transition("L2", "L3", ByteClass::byte(b'c'))
        .transition("L3", "ACCEPT", ByteClass::byte(b'd'))
        .start_state("START")
        .accept_state("ACCEPT")
        .max_backtrack_depth(2)
        .build();

    assert!(fsa.validate_with_backtracking(b"abcd"));
    assert!(fsa.backtrack_stats().max_stack_depth <= 2);
}

#[test]
fn test_backtracking_stats_reset() {
    let mut fsa = cat_or_catch();
    assert!(fsa.validate_with_backtracking(b"catch"));
    assert!(fsa.backtrack_stats().choice_points_created > 0);

    fsa.reset_backtrack_stats();
    let stats = fsa.backtrack_stats();
    assert_eq!(stats.choice_points_created, 0);
    assert_eq!(stats.backtracks_performed, 0);
    assert_eq!(stats.max_stack_depth, 0);
    assert_eq!(stats.paths_explored, 0);
}

#[test]
fn test_backtracking_empty_input() {
    let mut fsa = Builder::new("empty_ok")
        .add_state("START")
        .start_state("START")
        .accept_state("START")
        .build();
    assert!(fsa.validate_with_backtracking(b""));
}

// ----------------------------------------------------------------------
// Captures and hooks (scenarios E4, E5)
// ----------------------------------------------------------------------

/// Digits with an entry hook opening capture "num" and an exit hook
/// closing it, then an epsilon into the accept state.
fn capture_digits() -> Automaton {
    Builder::new("capture_digits")
        .transition("START", "DIGITS", ByteClass::digit())
        .transition("DIGITS", "DIGITS", ByteClass::digit())
        .epsilon("DIGITS", "ACCEPT")
        .on_state_entry("DIGITS", |ctx| ctx.begin_capture("num"))
        .on_state_exit("DIGITS", |ctx| {
            ctx.end_capture("num");
        })
        .start_state("START")
        .accept_state("ACCEPT")
        .build()
}

#[test]
fn test_streamed_capture_covers_all_digits() {
    let mut fsa = capture_digits();
    fsa.feed_all(b"123");
    assert_eq!(fsa.end_of_stream(), StreamStatus::Complete);

    assert_eq!(fsa.captures().len(), 1);
    let num = fsa.capture("num").expect("capture completed");
    assert_eq!(num.name, "num");
    assert_eq!(num.bytes, b"123");
    assert_eq!(num.start, 0);
    assert_eq!(num.end, 3);
    assert_eq!(num.as_text(), "123");
    assert_eq!(fsa.capture_by_index(0), Some(num));
}

#[test]
fn test_whole_input_capture_matches_streamed() {
    let mut fsa = capture_digits();
    assert!(fsa.validate(b"4711"));
    let num = fsa.capture("num").unwrap();
    assert_eq!(num.bytes, b"4711");
    assert_eq!((num.start, num.end), (0, 4));
}

#[test]
fn test_backtracking_restores_captures() {
    // Two alternatives from START, each opening capture "data" on entry;
    // only the second admits 'y' as the second byte.
    let mut fsa = Builder::new("bt_captures")
        .transition("START", "P1", ByteClass::byte(b'a'))
        .transition("START", "P2", ByteClass::byte(b'a'))
        .transition("P1", "ACCEPT", ByteClass::byte(b'x'))
        .transition("P2", "ACCEPT", ByteClass::byte(b'y'))
        .on_state_entry("P1", |ctx| ctx.begin_capture("data"))
        .on_state_entry("P2", |ctx| ctx.begin_capture("data"))
        .on_state_entry("ACCEPT", |ctx| {
            if ctx.has_active_capture("data") {
                ctx.end_capture("data");
            }
        })
        .start_state("START")
        .accept_state("ACCEPT")
        .build();

    assert!(fsa.validate_with_backtracking(b"ay"));
    assert!(fsa.backtrack_stats().backtracks_performed >= 1);

    // The failed first branch must leave no residue: exactly one capture,
    // holding the bytes of the successful path.
    assert_eq!(fsa.captures().len(), 1);
    let data = fsa.capture("data").unwrap();
    assert_eq!(data.bytes, b"a");
    assert_eq!((data.start, data.end), (0, 1));

    // A deterministic run over just the winning path produces the same
    // capture.
    let mut winning_path_only = Builder::new("winning_path")
        .transition("START", "P2", ByteClass::byte(b'a'))
        .transition("P2", "ACCEPT", ByteClass::byte(b'y'))
        .on_state_entry("P2", |ctx| ctx.begin_capture("data"))
        .on_state_entry("ACCEPT", |ctx| {
            if ctx.has_active_capture("data") {
                ctx.end_capture("data");
            }
        })
        .start_state("START")
        .accept_state("ACCEPT")
        .build();
    assert!(winning_path_only.validate(b"ay"));
    assert_eq!(winning_path_only.capture("data"), fsa.capture("data"));
}

#[test]
fn test_hook_order_on_consuming_transition() {
    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let exit_log = events.clone();
    let trans_log = events.clone();
    let entry_log = events.clone();

    let mut fsa = Builder::new("order")
        .transition("A", "B", ByteClass::byte(b'x'))
        .on_transition(move |ctx| {
            trans_log
                .borrow_mut()
                .push(format!("transition@{}", ctx.position))
        })
        .on_state_exit("A", move |ctx| {
            exit_log.borrow_mut().push(format!("exit(A)@{}", ctx.position))
        })
        .on_state_entry("B", move |ctx| {
            entry_log
                .borrow_mut()
                .push(format!("entry(B)@{}", ctx.position))
        })
        .start_state("A")
        .accept_state("B")
        .build();

    assert!(fsa.validate(b"x"));
    assert_eq!(
        *events.borrow(),
        vec!["exit(A)@0", "transition@0", "entry(B)@0"]
    );
}

#[test]
fn test_self_loop_fires_no_state_hooks() {
    let entries = Rc::new(RefCell::new(0u32));
    let counter = entries.clone();

    let mut fsa = Builder::new("loop")
        .transition("START", "NUM", ByteClass::digit())
        .transition("NUM", "NUM", ByteClass::digit())
        .on_state_entry("NUM", move |_| *counter.borrow_mut() += 1)
        .start_state("START")
        .accept_state("NUM")
        .build();

    assert!(fsa.validate(b"1234"));
    // Entered once; the three loop iterations stay in place.
    assert_eq!(*entries.borrow(), 1);
}

#[test]
fn test_epsilon_hooks_see_zero_byte() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();

    let mut fsa = Builder::new("eps_byte")
        .transition("START", "MID", ByteClass::digit())
        .epsilon("MID", "END")
        .on_state_entry("END", move |ctx| sink.borrow_mut().push((ctx.byte, ctx.position)))
        .start_state("START")
        .accept_state("END")
        .build();

    assert!(fsa.validate(b"7"));
    assert_eq!(*seen.borrow(), vec![(0u8, 1usize)]);
}

#[test]
fn test_transition_hook_observes_endpoints() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();

    let mut fsa = Builder::new("endpoints")
        .transition("A", "B", ByteClass::byte(b'k'))
        .on_transition(move |ctx| {
            sink.borrow_mut().push((
                ctx.state.name().unwrap().to_string(),
                ctx.to.as_ref().and_then(|t| t.name()).unwrap().to_string(),
                ctx.byte,
            ))
        })
        .start_state("A")
        .accept_state("B")
        .build();

    assert!(fsa.validate(b"k"));
    assert_eq!(*seen.borrow(), vec![("A".to_string(), "B".to_string(), b'k')]);
}

#[test]
fn test_user_data_visible_to_hooks() {
    let mut fsa = Builder::new("counting")
        .transition("START", "NUM", ByteClass::digit())
        .transition("NUM", "NUM", ByteClass::digit())
        .on_transition(|ctx| {
            if let Some(count) = ctx.user_data_mut::<usize>() {
                *count += 1;
            }
        })
        .start_state("START")
        .accept_state("NUM")
        .user_data(0usize)
        .build();

    // The hook sits on the loop edge, not the entry edge.
    assert!(fsa.validate(b"123"));
    assert_eq!(fsa.user_data::<usize>(), Some(&2));
}

#[test]
fn test_multiple_captures_close_in_order() {
    // The '-' lives on its own SEP state so neither capture sees it: the
    // byte driving a state entry joins the capture that entry opens.
    let mut fsa = Builder::new("two_parts")
        .transition("START", "AREA", ByteClass::digit())
        .transition("AREA", "AREA", ByteClass::digit())
        .transition("AREA", "SEP", ByteClass::byte(b'-'))
        .transition("SEP", "LINE", ByteClass::digit())
        .transition("LINE", "LINE", ByteClass::digit())
        .on_state_entry("AREA", |ctx| ctx.begin_capture("area"))
        .on_state_exit("AREA", |ctx| {
            ctx.end_capture("area");
        })
        .on_state_entry("LINE", |ctx| ctx.begin_capture("line"))
        .start_state("START")
        .accept_state("LINE")
        .build();

    assert!(fsa.validate(b"555-1234"));
    fsa.end_capture("line");

    assert_eq!(fsa.captures().len(), 2);
    assert_eq!(fsa.captures()[0].name, "area");
    assert_eq!(fsa.captures()[0].bytes, b"555");
    assert_eq!((fsa.captures()[0].start, fsa.captures()[0].end), (0, 3));
    assert_eq!(fsa.captures()[1].name, "line");
    assert_eq!(fsa.captures()[1].bytes, b"1234");
    assert_eq!((fsa.captures()[1].start, fsa.captures()[1].end), (4, 8));
}

// ----------------------------------------------------------------------
// Reset and reuse
// ----------------------------------------------------------------------

#[test]
fn test_validation_failure_does_not_poison_the_graph() {
    let mut fsa = three_digits();
    assert!(!fsa.validate(b"xxx"));
    assert!(fsa.last_error().is_some());
    assert!(fsa.validate(b"123"));
    assert!(fsa.last_error().is_none());
}

#[test]
fn test_streaming_then_whole_input_reuse() {
    let mut fsa = three_digits();
    fsa.feed_all(b"12");
    fsa.reset();
    assert_eq!(fsa.stream_status(), StreamStatus::Ready);
    assert!(fsa.validate(b"456"));
}

// ----------------------------------------------------------------------
// Log sink
// ----------------------------------------------------------------------

#[test]
fn test_sink_receives_trace_and_dot_dump() {
    #[derive(Clone)]
    struct Sink(Rc<RefCell<Vec<u8>>>);
    impl std::io::Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buf = Sink(Rc::new(RefCell::new(Vec::new())));
    let mut fsa = three_digits();
    fsa.debug_config_mut().flags =
        DebugFlags::TRACE_TRANSITIONS | DebugFlags::EXPORT_DOT_ON_ERROR;
    fsa.debug_config_mut().set_sink(Box::new(buf.clone()));

    assert!(!fsa.validate(b"12x"));

    let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
    assert!(text.contains("[fsa:three_digits]"), "{text}");
    assert!(text.contains("step 0"), "{text}");
    assert!(text.contains("digraph"), "{text}");
}
