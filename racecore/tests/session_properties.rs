use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use racecore::{
    CodeSnippet, Configuration, Key, KeyInput, Language, ManualClock, Phase, Tick,
    TypingSession, WpmBasis,
};
use rstest::rstest;
use web_time::Duration;

// --- STRATEGIES ---

fn arb_key() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        6 => prop::char::range('a', 'e').prop_map(KeyInput::char),
        1 => Just(KeyInput::char(' ')),
        2 => Just(KeyInput::new(Key::Backspace)),
        1 => Just(KeyInput::new(Key::Backspace).with_ctrl()),
        1 => Just(KeyInput::new(Key::Enter)),
        1 => Just(KeyInput::new(Key::Tab)),
        1 => Just(KeyInput::new(Key::Other)),
    ]
}

#[derive(Debug, Clone)]
enum Event {
    Key(KeyInput),
    Tick,
    Focus(bool),
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        8 => arb_key().prop_map(Event::Key),
        2 => Just(Event::Tick),
        1 => any::<bool>().prop_map(Event::Focus),
    ]
}

fn arb_snippet() -> impl Strategy<Value = String> {
    "[a-e \n]{1,24}"
}

proptest! {
    #[test]
    fn typed_never_exceeds_snippet(
        text in arb_snippet(),
        events in prop::collection::vec(arb_event(), 0..120)
    ) {
        let completions = Rc::new(Cell::new(0));
        let counter = Rc::clone(&completions);

        let mut session = TypingSession::new(CodeSnippet::new(1, Language::Rust, text.clone()))
            .unwrap()
            .on_complete(move |_| counter.set(counter.get() + 1));
        session.set_focused(true);

        let mut last_remaining = session.remaining_seconds();

        for event in events {
            let before = session.typed();
            let was_completed = session.is_completed();

            match event {
                Event::Key(key) => { session.handle_key(key); }
                Event::Tick => { session.tick(); }
                Event::Focus(focused) => session.set_focused(focused),
            }

            prop_assert!(session.input_len() <= text.chars().count());
            prop_assert!(session.remaining_seconds() <= last_remaining);
            last_remaining = session.remaining_seconds();

            if was_completed {
                prop_assert_eq!(session.typed(), before);
                prop_assert!(session.is_completed());
            }
        }

        prop_assert!(completions.get() <= 1);
        prop_assert_eq!(completions.get() == 1, session.is_completed());
    }

    #[test]
    fn accuracy_is_a_percentage(
        text in arb_snippet(),
        keys in prop::collection::vec(arb_key(), 1..60)
    ) {
        let mut session = TypingSession::new(CodeSnippet::new(1, Language::Rust, text))
            .unwrap()
            .with_configuration(Configuration { countdown_seconds: 1, ..Default::default() });
        session.set_focused(true);

        for key in keys {
            session.handle_key(key);
        }
        session.tick();

        if let Some(result) = session.result() {
            prop_assert!((0.0..=100.0).contains(&result.accuracy));
            prop_assert!(result.wpm.is_finite());
        }
    }
}

#[test]
fn countdown_from_fifteen_completes_once() {
    let clock = ManualClock::new();
    let completions = Rc::new(Cell::new(0));
    let counter = Rc::clone(&completions);

    let mut session = TypingSession::new(CodeSnippet::new(
        7,
        Language::JavaScript,
        "function greet(name) {}",
    ))
    .unwrap()
    .with_clock(clock.clone())
    .on_complete(move |_| counter.set(counter.get() + 1));
    session.set_focused(true);

    session.handle_key(KeyInput::char('f'));

    for second in 1..=15 {
        clock.advance(Duration::from_secs(1));
        let tick = session.poll();
        if second < 15 {
            assert_eq!(tick, Some(Tick::Remaining(15 - second)));
        } else {
            assert_eq!(tick, Some(Tick::Expired));
        }
    }

    assert_eq!(session.phase(), Phase::Completed);
    assert_eq!(session.remaining_seconds(), 0);

    clock.advance(Duration::from_secs(10));
    assert_eq!(session.poll(), None);
    assert_eq!(completions.get(), 1);

    let result = session.result().unwrap();
    assert_eq!(result.elapsed, Duration::from_secs(15));
    assert_eq!(result.accuracy, 100.0);
    // 1 character = 0.2 words over a quarter of a minute
    assert_eq!(result.wpm, 1.0);
}

#[rstest]
#[case::elapsed(WpmBasis::Elapsed, 12.0)]
#[case::remaining(WpmBasis::Remaining, 3.0)]
fn expiry_scores_each_basis(#[case] wpm_basis: WpmBasis, #[case] wpm: f64) {
    let clock = ManualClock::new();
    let mut session = TypingSession::new(CodeSnippet::new(
        3,
        Language::Go,
        "for _, v := range values {",
    ))
    .unwrap()
    .with_clock(clock.clone())
    .with_configuration(Configuration {
        countdown_seconds: 15,
        wpm_basis,
    });
    session.set_focused(true);

    for character in "for _, v := ra".chars() {
        session.handle_key(KeyInput::char(character));
    }
    // 15 characters typed, one of them wrong
    session.handle_key(KeyInput::char('x'));

    clock.advance(Duration::from_secs(15));
    assert_eq!(session.poll(), Some(Tick::Expired));

    let result = session.result().unwrap();
    assert_eq!(result.elapsed, Duration::from_secs(15));
    assert_eq!(result.wpm, wpm);
    assert_eq!(result.accuracy, 14.0 / 15.0 * 100.0);
}

#[test]
fn remaining_basis_scores_against_the_countdown() {
    let clock = ManualClock::new();
    let mut session = TypingSession::new(CodeSnippet::new(1, Language::Python, "pass"))
        .unwrap()
        .with_clock(clock.clone())
        .with_configuration(Configuration {
            countdown_seconds: 15,
            wpm_basis: WpmBasis::Remaining,
        });
    session.set_focused(true);

    session.handle_key(KeyInput::char('p'));
    clock.advance(Duration::from_secs(3));
    session.poll();
    for character in "ass".chars() {
        session.handle_key(KeyInput::char(character));
    }

    // 4 characters = 0.8 words against the 12 seconds left
    assert_eq!(session.result().unwrap().wpm, 4.0);
}

#[test]
fn word_deletion_and_retyping() {
    let mut session =
        TypingSession::new(CodeSnippet::new(1, Language::Rust, "let x = 1;")).unwrap();
    session.set_focused(true);

    for character in "let y ".chars() {
        session.handle_key(KeyInput::char(character));
    }
    session.handle_key(KeyInput::new(Key::Backspace).with_ctrl());
    assert_eq!(session.typed(), "let ");

    for character in "x = 1;".chars() {
        session.handle_key(KeyInput::char(character));
    }
    assert!(session.is_completed());
    assert_eq!(session.result().unwrap().accuracy, 100.0);
}
