/// Coverage-guided input fuzzer.
///
/// The queue holds every interesting stem found so far; a prefix trie of
/// everything already simulated makes duplicates and dead prefixes free
/// to skip. Each stem gets its one-symbol extensions tried, then a burst
/// of stacked random mutations.
///
/// Simulations run in-process: the simulator is a pure function of
/// (world, inputs), memory safety closes the crash channel the original
/// needed process isolation for, and the route-length cap bounds every
/// run, so there is no hang budget to manage.

use std::fs::OpenOptions;
use std::io::Write;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::sim::step::{do_beat, BeatOutcome, Input};
use crate::sim::world::World;

use super::route::{pretty_codes, MAX_LENGTH};
use super::solve::fitness;

/// The fuzzing alphabet: four directions and the bomb.
pub const ALPHABET: [Input; 5] =
    [Input::Left, Input::Down, Input::Right, Input::Up, Input::Bomb];

#[derive(Clone, Debug)]
pub struct FuzzerTuning {
    pub max_passes: u64,
    /// Queue admission window above the best score.
    pub backtrack: u16,
    /// Queue cycles to run before stopping; 0 means run one cycle.
    pub cycles: u64,
    pub rng_seed: u64,
    /// Where discovered routes are appended; empty disables the file.
    pub routes_path: String,
}

impl Default for FuzzerTuning {
    fn default() -> Self {
        FuzzerTuning {
            max_passes: 2048,
            backtrack: 2,
            cycles: 1,
            rng_seed: 1,
            routes_path: String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FuzzStats {
    pub queued_stems: u64,
    pub queued_favored: u64,
    pub pending_stems: u64,
    pub pending_favored: u64,
    pub total_routes: u64,
    pub total_execs: u64,
    pub queue_cycles: u64,
}

struct QueueEntry {
    input: Vec<u8>,
    was_fuzzed: bool,
    favored: bool,
    score: u16,
}

#[derive(Default)]
struct TreeNode {
    child: [Option<Box<TreeNode>>; ALPHABET.len()],
    was_run: bool,
    game_over: bool,
}

enum Mutation {
    Update,
    Delete,
    Insert,
}

pub struct Fuzzer {
    initial: World,
    tuning: FuzzerTuning,
    queue: Vec<QueueEntry>,
    cur: usize,
    best: usize,
    tree: TreeNode,
    rng: SmallRng,
    buf: Vec<u8>,
    stats: FuzzStats,
    routes: Vec<Vec<u8>>,
}

impl Fuzzer {
    pub fn new(initial: World, tuning: FuzzerTuning) -> Self {
        let rng = SmallRng::seed_from_u64(tuning.rng_seed);
        let mut fuzzer = Fuzzer {
            initial,
            tuning,
            queue: Vec::new(),
            cur: 0,
            best: 0,
            tree: TreeNode::default(),
            rng,
            buf: Vec::new(),
            stats: FuzzStats::default(),
            routes: Vec::new(),
        };
        // Seed entry: the empty stem, with a score bad enough that
        // anything real replaces it as the favorite.
        fuzzer.add_to_queue(200);
        fuzzer
    }

    /// Play the buffered inputs on a fresh clone of the initial world.
    /// Returns (game over, status): status 0 is a win, 126 a death, and
    /// anything else the live fitness capped below both.
    fn simulate(&mut self, codes: &[u8]) -> (bool, u16) {
        self.stats.total_execs += 1;
        let mut world = self.initial.clone();
        for code in codes {
            match do_beat(&mut world, Input::from_code(*code)) {
                BeatOutcome::Victory => return (true, 0),
                BeatOutcome::Death => return (true, 126),
                BeatOutcome::Ongoing => {}
            }
        }
        (false, fitness(&world).clamp(1, 125) as u16)
    }

    fn exists_in_tree(&self) -> bool {
        let mut node = &self.tree;
        for code in &self.buf {
            if node.game_over {
                return true;
            }
            match &node.child[*code as usize] {
                Some(next) => node = next,
                None => return false,
            }
        }
        node.was_run
    }

    fn add_to_tree(&mut self, game_over: bool) {
        let mut node = &mut self.tree;
        for code in &self.buf {
            node = node.child[*code as usize].get_or_insert_with(Box::default);
        }
        node.was_run = true;
        node.game_over = game_over;
    }

    fn add_to_queue(&mut self, score: u16) {
        if !self.queue.is_empty() && score > self.queue[self.best].score + self.tuning.backtrack
        {
            return;
        }
        let favored = self.queue.is_empty() || score <= self.queue[self.best].score;
        self.queue.push(QueueEntry {
            input: self.buf.clone(),
            was_fuzzed: false,
            favored,
            score,
        });
        if favored {
            self.best = self.queue.len() - 1;
            self.stats.queued_favored += 1;
            self.stats.pending_favored += 1;
        }
        self.stats.queued_stems += 1;
        self.stats.pending_stems += 1;
    }

    /// Simulate the buffer unless the trie already knows the answer.
    fn run_simulation(&mut self) {
        if self.exists_in_tree() {
            return;
        }
        let codes = self.buf.clone();
        let (game_over, status) = self.simulate(&codes);

        if status == 0 && self.buf.len() as u16 <= self.queue[self.best].score {
            self.stats.total_routes += 1;
            self.record_route();
        }

        self.add_to_tree(game_over);
        let score = status + self.buf.len() as u16;
        self.add_to_queue(score);
    }

    fn record_route(&mut self) {
        let route = self.buf.clone();
        log::info!("route {}", pretty_codes(&route));
        if !self.tuning.routes_path.is_empty() {
            let line: String =
                route.iter().filter_map(|c| Input::from_code(*c)).map(|i| i.byte() as char).collect();
            if let Ok(mut f) =
                OpenOptions::new().append(true).create(true).open(&self.tuning.routes_path)
            {
                let _ = writeln!(f, "{line}");
            }
        }
        self.routes.push(route);
    }

    /// One random edit to the buffer.
    fn mutate(&mut self) {
        let len = self.buf.len();
        let op = if len < 2 {
            Mutation::Insert
        } else {
            match self.rng.random_range(0..3) {
                0 => Mutation::Update,
                1 => Mutation::Delete,
                _ => Mutation::Insert,
            }
        };
        match op {
            Mutation::Update => {
                let at = self.rng.random_range(0..len);
                self.buf[at] = self.rng.random_range(0..ALPHABET.len()) as u8;
            }
            Mutation::Delete => {
                let at = self.rng.random_range(0..len);
                self.buf.remove(at);
            }
            Mutation::Insert => {
                if len < MAX_LENGTH {
                    let at = self.rng.random_range(0..=len);
                    self.buf.insert(at, self.rng.random_range(0..ALPHABET.len()) as u8);
                }
            }
        }
    }

    /// Fuzz the current queue entry: deterministic one-symbol extensions
    /// first, then stacked random mutations, more of them per pass as the
    /// cycles go by.
    fn fuzz_one(&mut self) {
        let cur = &self.queue[self.cur];
        if cur.was_fuzzed && self.stats.pending_stems > 0 && self.rng.random_range(0..20) != 0 {
            return;
        }
        if !cur.favored && self.stats.pending_favored > 0 && self.rng.random_range(0..20) != 0 {
            return;
        }

        let stem = self.queue[self.cur].input.clone();
        let stem_score = self.queue[self.cur].score;

        if stem.len() < MAX_LENGTH {
            for code in 0..ALPHABET.len() as u8 {
                self.buf = stem.clone();
                self.buf.push(code);
                self.run_simulation();
            }
        }

        let stacking = self.stats.queue_cycles + 1;
        let handicap = 1 + u64::from(stem_score.saturating_sub(self.queue[self.best].score));
        let passes = self.tuning.max_passes / handicap;
        for _ in 0..passes {
            self.buf = stem.clone();
            let mutations = 2u64 << self.rng.random_range(0..stacking);
            for _ in 0..mutations {
                self.mutate();
            }
            self.run_simulation();
        }

        if !self.queue[self.cur].was_fuzzed {
            self.queue[self.cur].was_fuzzed = true;
            self.stats.pending_stems -= 1;
            self.stats.pending_favored -= u64::from(self.queue[self.cur].favored);
        }
    }

    /// Run whole queue cycles until the configured budget is spent.
    /// Returns the routes found, shortest first.
    pub fn run(&mut self) -> Vec<Vec<u8>> {
        let cycles = self.tuning.cycles.max(1);
        while self.stats.queue_cycles < cycles {
            self.fuzz_one();
            self.cur += 1;
            if self.cur >= self.queue.len() {
                self.cur = 0;
                self.stats.queue_cycles += 1;
                log::info!(
                    "cycle {}: {} stems ({} favored), {} routes, {} execs",
                    self.stats.queue_cycles,
                    self.stats.queued_stems,
                    self.stats.queued_favored,
                    self.stats.total_routes,
                    self.stats.total_execs,
                );
            }
        }
        let mut routes = self.routes.clone();
        routes.sort_by_key(Vec::len);
        routes
    }

    pub fn stats(&self) -> FuzzStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::diagram::world_from;

    fn tiny_world() -> World {
        let mut world = world_from(&["@.>"]);
        world.boots_on = false;
        world.miniboss_killed = true;
        world.sarcophagus_killed = true;
        world
    }

    #[test]
    fn finds_the_two_step_route() {
        let tuning = FuzzerTuning { max_passes: 64, cycles: 2, ..FuzzerTuning::default() };
        let mut fuzzer = Fuzzer::new(tiny_world(), tuning);
        let routes = fuzzer.run();
        assert!(routes.iter().any(|r| r == &vec![2, 2]));
    }

    #[test]
    fn trie_never_simulates_a_sequence_twice() {
        let tuning = FuzzerTuning { max_passes: 0, cycles: 1, ..FuzzerTuning::default() };
        let mut fuzzer = Fuzzer::new(tiny_world(), tuning);
        fuzzer.buf = vec![0, 1];
        fuzzer.run_simulation();
        let execs = fuzzer.stats.total_execs;
        fuzzer.buf = vec![0, 1];
        fuzzer.run_simulation();
        assert_eq!(fuzzer.stats.total_execs, execs);
    }

    #[test]
    fn game_over_prefixes_prune_extensions() {
        let tuning = FuzzerTuning { max_passes: 0, cycles: 1, ..FuzzerTuning::default() };
        let mut fuzzer = Fuzzer::new(tiny_world(), tuning);
        // A winning prefix is terminal; anything beyond it is dead air.
        fuzzer.buf = vec![2, 2];
        fuzzer.run_simulation();
        let execs = fuzzer.stats.total_execs;
        fuzzer.buf = vec![2, 2, 0];
        fuzzer.run_simulation();
        assert_eq!(fuzzer.stats.total_execs, execs);
    }

    #[test]
    fn mutations_respect_the_length_cap() {
        let tuning = FuzzerTuning::default();
        let mut fuzzer = Fuzzer::new(tiny_world(), tuning);
        fuzzer.buf = vec![0; MAX_LENGTH];
        for _ in 0..200 {
            fuzzer.mutate();
            assert!(fuzzer.buf.len() <= MAX_LENGTH);
        }
    }
}
