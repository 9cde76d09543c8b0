use rand::Rng;

use super::board::Board;
use super::card::{Card, Identity};
use super::error::Result;
use super::score::Score;

/// User input forwarded by the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    CardClicked(usize),
    ContinueClicked,
    ExitClicked,
    ExitAnswered(bool),
    NewGame,
}

/// What the shell has to do after an input was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Reveal(usize),
    Hide(usize),
    Stats { attempts: u32, matches: u32 },
    ContinueEnabled(bool),
    /// Ask the player to confirm the exit and answer with `Input::ExitAnswered`.
    ConfirmExit,
    ShowScore(Score),
    /// Every card was hidden and the board reshuffled.
    Redeal,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    OneSelected,
    AwaitingContinue,
    GameOver,
    ConfirmingExit,
    Exited,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Turn {
    Idle,
    OneSelected { first: usize },
    AwaitingContinue { first: usize, second: usize },
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitPrompt {
    Closed,
    Confirming,
    Exited,
}

pub struct GameController {
    board: Board,
    attempts: u32,
    matches: u32,
    turn: Turn,
    exit: ExitPrompt,
    score_reported: bool,
}

impl GameController {
    pub fn new(identities: &[Identity], columns: usize) -> Result<Self> {
        Self::with_rng(identities, columns, &mut rand::rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        identities: &[Identity],
        columns: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut board = Board::build(identities, columns)?;
        board.shuffle(rng);
        Ok(Self {
            board,
            attempts: 0,
            matches: 0,
            turn: Turn::Idle,
            exit: ExitPrompt::Closed,
            score_reported: false,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.board.get(index)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn pair_count(&self) -> u32 {
        self.board.pair_count()
    }

    pub fn continue_enabled(&self) -> bool {
        matches!(self.turn, Turn::AwaitingContinue { .. })
    }

    pub fn selection(&self) -> (Option<usize>, Option<usize>) {
        match self.turn {
            Turn::OneSelected { first } => (Some(first), None),
            Turn::AwaitingContinue { first, second } => (Some(first), Some(second)),
            Turn::Idle | Turn::GameOver => (None, None),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.exit {
            ExitPrompt::Exited => return Phase::Exited,
            ExitPrompt::Confirming => return Phase::ConfirmingExit,
            ExitPrompt::Closed => {}
        }
        match self.turn {
            Turn::Idle => Phase::Idle,
            Turn::OneSelected { .. } => Phase::OneSelected,
            Turn::AwaitingContinue { .. } => Phase::AwaitingContinue,
            Turn::GameOver => Phase::GameOver,
        }
    }

    pub fn handle(&mut self, input: Input) -> Vec<Effect> {
        match input {
            Input::CardClicked(index) => self.select_card(index),
            Input::ContinueClicked => self.continue_turn(),
            Input::ExitClicked => self.request_exit(),
            Input::ExitAnswered(confirmed) => self.answer_exit(confirmed),
            Input::NewGame => self.new_game(),
        }
    }

    pub fn select_card(&mut self, index: usize) -> Vec<Effect> {
        if self.exit != ExitPrompt::Closed {
            return Vec::new();
        }
        let Some(card) = self.board.get_mut(index) else {
            return Vec::new();
        };
        // Covers the pending first pick as well: it is already face-up.
        if card.is_revealed() {
            return Vec::new();
        }

        match self.turn {
            Turn::Idle => {
                card.reveal();
                self.turn = Turn::OneSelected { first: index };
                log::debug!("first pick {index}");
                vec![Effect::Reveal(index)]
            }
            Turn::OneSelected { first } => {
                card.reveal();
                log::debug!("second pick {index}");
                let mut effects = vec![Effect::Reveal(index)];
                self.evaluate(first, index, &mut effects);
                effects
            }
            Turn::AwaitingContinue { .. } | Turn::GameOver => Vec::new(),
        }
    }

    fn evaluate(&mut self, first: usize, second: usize, effects: &mut Vec<Effect>) {
        self.attempts = self.attempts.saturating_add(1);

        let is_match = match (self.board.get(first), self.board.get(second)) {
            (Some(a), Some(b)) => a.matches(b),
            _ => false,
        };

        if is_match {
            self.matches = self.matches.saturating_add(1);
            self.turn = Turn::Idle;
            log::debug!("match {first}/{second}");
        } else {
            self.turn = Turn::AwaitingContinue { first, second };
            log::debug!("mismatch {first}/{second}");
        }

        effects.push(Effect::Stats {
            attempts: self.attempts,
            matches: self.matches,
        });

        if !is_match {
            effects.push(Effect::ContinueEnabled(true));
        } else if self.matches >= self.pair_count() {
            self.turn = Turn::GameOver;
            log::info!(
                "all {} pairs found in {} attempts",
                self.matches,
                self.attempts
            );
            if let Some(score) = self.report_score() {
                effects.push(Effect::ShowScore(score));
            }
        }
    }

    fn report_score(&mut self) -> Option<Score> {
        if self.score_reported {
            return None;
        }
        self.score_reported = true;
        Some(Score::from_counts(self.attempts, self.matches))
    }

    pub fn continue_turn(&mut self) -> Vec<Effect> {
        if self.exit != ExitPrompt::Closed {
            return Vec::new();
        }
        let Turn::AwaitingContinue { first, second } = self.turn else {
            return Vec::new();
        };

        for index in [first, second] {
            if let Some(card) = self.board.get_mut(index) {
                card.hide();
            }
        }
        self.turn = Turn::Idle;
        vec![
            Effect::Hide(first),
            Effect::Hide(second),
            Effect::ContinueEnabled(false),
        ]
    }

    pub fn request_exit(&mut self) -> Vec<Effect> {
        if self.exit != ExitPrompt::Closed {
            return Vec::new();
        }
        self.exit = ExitPrompt::Confirming;
        vec![Effect::ConfirmExit]
    }

    pub fn answer_exit(&mut self, confirmed: bool) -> Vec<Effect> {
        if self.exit != ExitPrompt::Confirming {
            return Vec::new();
        }
        if !confirmed {
            self.exit = ExitPrompt::Closed;
            return Vec::new();
        }

        let mut effects = Vec::new();
        if self.matches < self.pair_count()
            && let Some(score) = self.report_score()
        {
            effects.push(Effect::ShowScore(score));
        }
        self.exit = ExitPrompt::Exited;
        log::info!(
            "exiting after {} attempts and {} matches",
            self.attempts,
            self.matches
        );
        effects.push(Effect::Quit);
        effects
    }

    pub fn new_game(&mut self) -> Vec<Effect> {
        self.new_game_with(&mut rand::rng())
    }

    pub fn new_game_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<Effect> {
        if self.exit == ExitPrompt::Exited {
            return Vec::new();
        }
        self.board.hide_all();
        self.board.shuffle(rng);
        self.attempts = 0;
        self.matches = 0;
        self.turn = Turn::Idle;
        self.exit = ExitPrompt::Closed;
        self.score_reported = false;
        log::info!("new game with {} pairs", self.pair_count());
        vec![
            Effect::Redeal,
            Effect::Stats {
                attempts: 0,
                matches: 0,
            },
            Effect::ContinueEnabled(false),
        ]
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::game::board::DEFAULT_COLUMNS;
    use crate::game::score::Classification;

    fn animals() -> Vec<Identity> {
        ["bear", "bird", "cow", "cat", "deer", "fox", "owl", "squirrel"]
            .into_iter()
            .map(|name| Identity::new(name, name))
            .collect()
    }

    fn controller(seed: u64) -> GameController {
        let mut rng = StdRng::seed_from_u64(seed);
        GameController::with_rng(&animals(), DEFAULT_COLUMNS, &mut rng).unwrap()
    }

    fn partner_of(ctl: &GameController, index: usize) -> usize {
        let name = &ctl.card(index).unwrap().identity().name;
        ctl.board()
            .iter()
            .enumerate()
            .position(|(i, card)| i != index && &card.identity().name == name)
            .unwrap()
    }

    fn stranger_of(ctl: &GameController, index: usize) -> usize {
        let card = ctl.card(index).unwrap();
        ctl.board()
            .iter()
            .position(|other| !card.matches(other) && !other.is_revealed())
            .unwrap()
    }

    fn first_hidden(ctl: &GameController) -> usize {
        ctl.board().iter().position(|card| !card.is_revealed()).unwrap()
    }

    /// Matches every remaining pair without a single mistake.
    fn solve(ctl: &mut GameController) -> Vec<Effect> {
        let mut effects = Vec::new();
        while ctl.phase() == Phase::Idle {
            let first = first_hidden(ctl);
            let second = partner_of(ctl, first);
            effects.extend(ctl.handle(Input::CardClicked(first)));
            effects.extend(ctl.handle(Input::CardClicked(second)));
        }
        effects
    }

    fn score_effects(effects: &[Effect]) -> Vec<Score> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::ShowScore(score) => Some(*score),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fresh_game_is_idle() {
        let ctl = controller(1);
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.attempts(), 0);
        assert_eq!(ctl.matches(), 0);
        assert_eq!(ctl.pair_count(), 8);
        assert!(!ctl.continue_enabled());
        assert!(ctl.board().iter().all(|card| !card.is_revealed()));
    }

    #[test]
    fn test_invalid_deck_is_rejected() {
        assert!(GameController::new(&[], DEFAULT_COLUMNS).is_err());
    }

    #[test]
    fn test_first_pick_reveals_card() {
        let mut ctl = controller(2);
        let effects = ctl.handle(Input::CardClicked(5));
        assert_eq!(effects, vec![Effect::Reveal(5)]);
        assert_eq!(ctl.phase(), Phase::OneSelected);
        assert_eq!(ctl.selection(), (Some(5), None));
        assert!(ctl.card(5).unwrap().is_revealed());
    }

    #[test]
    fn test_match_resolves_immediately() {
        let mut ctl = controller(3);
        let second = partner_of(&ctl, 0);
        ctl.handle(Input::CardClicked(0));
        let effects = ctl.handle(Input::CardClicked(second));

        assert_eq!(
            effects,
            vec![
                Effect::Reveal(second),
                Effect::Stats {
                    attempts: 1,
                    matches: 1
                },
            ]
        );
        assert_eq!(ctl.phase(), Phase::Idle);
        assert!(!ctl.continue_enabled());
        assert!(ctl.card(0).unwrap().is_revealed());
        assert!(ctl.card(second).unwrap().is_revealed());
        assert_eq!(ctl.selection(), (None, None));
    }

    #[test]
    fn test_mismatch_requires_continue() {
        let mut ctl = controller(4);
        let second = stranger_of(&ctl, 0);
        ctl.handle(Input::CardClicked(0));
        let effects = ctl.handle(Input::CardClicked(second));

        assert_eq!(
            effects,
            vec![
                Effect::Reveal(second),
                Effect::Stats {
                    attempts: 1,
                    matches: 0
                },
                Effect::ContinueEnabled(true),
            ]
        );
        assert_eq!(ctl.phase(), Phase::AwaitingContinue);
        assert!(ctl.continue_enabled());

        let effects = ctl.handle(Input::ContinueClicked);
        assert_eq!(
            effects,
            vec![
                Effect::Hide(0),
                Effect::Hide(second),
                Effect::ContinueEnabled(false),
            ]
        );
        assert_eq!(ctl.phase(), Phase::Idle);
        assert!(!ctl.continue_enabled());
        assert!(!ctl.card(0).unwrap().is_revealed());
        assert!(!ctl.card(second).unwrap().is_revealed());
    }

    #[test]
    fn test_third_pick_is_ignored() {
        let mut ctl = controller(5);
        let second = stranger_of(&ctl, 0);
        ctl.handle(Input::CardClicked(0));
        ctl.handle(Input::CardClicked(second));
        let third = first_hidden(&ctl);

        assert!(ctl.handle(Input::CardClicked(third)).is_empty());
        assert!(!ctl.card(third).unwrap().is_revealed());
        assert_eq!(ctl.attempts(), 1);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let mut ctl = controller(6);
        ctl.handle(Input::CardClicked(3));
        assert!(ctl.handle(Input::CardClicked(3)).is_empty());
        assert_eq!(ctl.phase(), Phase::OneSelected);
        assert_eq!(ctl.attempts(), 0);
    }

    #[test]
    fn test_matched_card_cannot_be_picked() {
        let mut ctl = controller(7);
        let second = partner_of(&ctl, 0);
        ctl.handle(Input::CardClicked(0));
        ctl.handle(Input::CardClicked(second));

        assert!(ctl.handle(Input::CardClicked(0)).is_empty());
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn test_out_of_range_pick_is_ignored() {
        let mut ctl = controller(8);
        assert!(ctl.handle(Input::CardClicked(16)).is_empty());
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn test_continue_without_mismatch_is_ignored() {
        let mut ctl = controller(9);
        assert!(ctl.handle(Input::ContinueClicked).is_empty());
        ctl.handle(Input::CardClicked(0));
        assert!(ctl.handle(Input::ContinueClicked).is_empty());
        assert_eq!(ctl.phase(), Phase::OneSelected);
    }

    #[test]
    fn test_perfect_game_reports_score_once() {
        let mut ctl = controller(10);
        let effects = solve(&mut ctl);

        assert_eq!(ctl.phase(), Phase::GameOver);
        assert_eq!(ctl.matches(), 8);
        assert_eq!(ctl.attempts(), 8);
        let scores = score_effects(&effects);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].value, 100);
        assert_eq!(scores[0].classification, Classification::Amazing);
    }

    #[test]
    fn test_game_over_ignores_gameplay_input() {
        let mut ctl = controller(11);
        solve(&mut ctl);

        for index in 0..16 {
            assert!(ctl.handle(Input::CardClicked(index)).is_empty());
        }
        assert!(ctl.handle(Input::ContinueClicked).is_empty());
        assert_eq!(ctl.phase(), Phase::GameOver);
        assert_eq!(ctl.attempts(), 8);
    }

    #[test]
    fn test_exit_after_game_over_does_not_score_again() {
        let mut ctl = controller(12);
        solve(&mut ctl);

        assert_eq!(ctl.handle(Input::ExitClicked), vec![Effect::ConfirmExit]);
        assert_eq!(ctl.handle(Input::ExitAnswered(true)), vec![Effect::Quit]);
        assert_eq!(ctl.phase(), Phase::Exited);
    }

    #[test]
    fn test_exit_mid_game_reports_score_then_quits() {
        let mut ctl = controller(13);
        let second = stranger_of(&ctl, 0);
        ctl.handle(Input::CardClicked(0));
        ctl.handle(Input::CardClicked(second));

        ctl.handle(Input::ExitClicked);
        let effects = ctl.handle(Input::ExitAnswered(true));
        assert_eq!(
            effects,
            vec![Effect::ShowScore(Score::from_counts(1, 0)), Effect::Quit]
        );
        assert!(ctl.handle(Input::NewGame).is_empty());
        assert!(ctl.handle(Input::ExitClicked).is_empty());
    }

    #[test]
    fn test_declined_exit_restores_turn() {
        let mut ctl = controller(14);
        let second = stranger_of(&ctl, 0);
        ctl.handle(Input::CardClicked(0));
        ctl.handle(Input::CardClicked(second));

        ctl.handle(Input::ExitClicked);
        assert_eq!(ctl.phase(), Phase::ConfirmingExit);
        assert!(ctl.handle(Input::ContinueClicked).is_empty());
        assert!(ctl.handle(Input::ExitClicked).is_empty());

        assert!(ctl.handle(Input::ExitAnswered(false)).is_empty());
        assert_eq!(ctl.phase(), Phase::AwaitingContinue);
        assert!(ctl.continue_enabled());
        assert_eq!(ctl.attempts(), 1);
    }

    #[test]
    fn test_cards_are_locked_while_confirming_exit() {
        let mut ctl = controller(15);
        ctl.handle(Input::ExitClicked);
        assert!(ctl.handle(Input::CardClicked(0)).is_empty());
        assert!(!ctl.card(0).unwrap().is_revealed());
    }

    #[test]
    fn test_stray_exit_answer_is_ignored() {
        let mut ctl = controller(16);
        assert!(ctl.handle(Input::ExitAnswered(true)).is_empty());
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn test_new_game_resets_everything() {
        let mut ctl = controller(17);
        let mut rng = StdRng::seed_from_u64(99);
        let second = stranger_of(&ctl, 0);
        ctl.handle(Input::CardClicked(0));
        ctl.handle(Input::CardClicked(second));

        let effects = ctl.new_game_with(&mut rng);
        assert_eq!(
            effects,
            vec![
                Effect::Redeal,
                Effect::Stats {
                    attempts: 0,
                    matches: 0
                },
                Effect::ContinueEnabled(false),
            ]
        );
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.attempts(), 0);
        assert_eq!(ctl.matches(), 0);
        assert_eq!(ctl.selection(), (None, None));
        assert!(ctl.board().iter().all(|card| !card.is_revealed()));
    }

    #[test]
    fn test_new_game_reshuffles() {
        let mut ctl = controller(18);
        let mut rng = StdRng::seed_from_u64(1234);
        let order = |ctl: &GameController| -> Vec<String> {
            ctl.board()
                .iter()
                .map(|card| card.identity().name.clone())
                .collect()
        };

        let before = order(&ctl);
        let changed = (0..5).any(|_| {
            ctl.new_game_with(&mut rng);
            order(&ctl) != before
        });
        assert!(changed);
    }

    #[test]
    fn test_new_game_after_game_over_scores_again() {
        let mut ctl = controller(19);
        solve(&mut ctl);
        ctl.handle(Input::NewGame);
        let effects = solve(&mut ctl);
        assert_eq!(score_effects(&effects).len(), 1);
    }

    #[test]
    fn test_new_game_closes_exit_prompt() {
        let mut ctl = controller(20);
        ctl.handle(Input::ExitClicked);
        ctl.handle(Input::NewGame);
        assert_eq!(ctl.phase(), Phase::Idle);
        assert!(ctl.handle(Input::ExitAnswered(true)).is_empty());
    }

    fn input_strategy() -> impl Strategy<Value = Input> {
        prop_oneof![
            6 => (0usize..17).prop_map(Input::CardClicked),
            2 => Just(Input::ContinueClicked),
            1 => Just(Input::ExitClicked),
            1 => Just(Input::ExitAnswered(false)),
            1 => Just(Input::NewGame),
            1 => Just(Input::ExitAnswered(true)),
        ]
    }

    proptest! {
        #[test]
        fn prop_turn_invariants_hold(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(input_strategy(), 0..200),
        ) {
            let mut ctl = controller(seed);
            let mut scores_this_game = 0;

            for input in inputs {
                let exited = ctl.phase() == Phase::Exited;
                let (mut attempts, mut matches) = (ctl.attempts(), ctl.matches());
                let effects = ctl.handle(input);

                if exited {
                    prop_assert!(effects.is_empty());
                } else if input == Input::NewGame {
                    scores_this_game = 0;
                    attempts = 0;
                    matches = 0;
                }
                scores_this_game += score_effects(&effects).len();
                prop_assert!(scores_this_game <= 1);

                prop_assert!(ctl.attempts() >= attempts);
                prop_assert!(ctl.matches() >= matches);
                prop_assert!(ctl.matches() <= ctl.attempts());
                prop_assert!(ctl.matches() <= ctl.pair_count());

                let (first, second) = ctl.selection();
                let both_set_and_different = match (first, second) {
                    (Some(a), Some(b)) => !ctl.card(a).unwrap().matches(ctl.card(b).unwrap()),
                    _ => false,
                };
                prop_assert_eq!(ctl.continue_enabled(), both_set_and_different);

                let revealed = ctl.board().iter().filter(|card| card.is_revealed()).count();
                let selected = usize::from(first.is_some()) + usize::from(second.is_some());
                prop_assert_eq!(revealed, ctl.matches() as usize * 2 + selected);

                if ctl.matches() == ctl.pair_count() {
                    prop_assert!(matches!(
                        ctl.phase(),
                        Phase::GameOver | Phase::ConfirmingExit | Phase::Exited
                    ));
                }
            }
        }
    }
}
