//! MCTS engine: select → expand → simulate → backpropagate.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{EngineConfig, SearchConfig};
use crate::error::Result;
use crate::generator::CandidateGenerator;
use crate::obs;
use crate::sandbox::{Evaluator, Sandbox};
use crate::tree::{join_state, NodeId, SearchTree};

use super::problem::SearchProblem;
use super::progress::progress_line;
use super::reward::{reward_for, REWARD_SUCCESS};

/// What a search run produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchOutcome {
    /// Passing program, or the best partial candidate when unsolved.
    pub code: String,
    pub solved: bool,
    pub iterations_used: u32,
    /// Depth of the returned node.
    pub depth: usize,
    pub tree_size: usize,
}

/// Single-threaded MCTS over program states.
///
/// The engine exclusively owns the tree. The tree persists across calls to
/// [`search`](Self::search), so a second call continues where the first
/// stopped.
pub struct SearchEngine<G, E = Sandbox> {
    generator: G,
    evaluator: E,
    problem: SearchProblem,
    config: SearchConfig,
    tree: SearchTree,
    rng: ChaCha8Rng,
}

impl<G: CandidateGenerator> SearchEngine<G, Sandbox> {
    /// Engine grading candidates in a [`Sandbox`] built from `config.sandbox`.
    pub fn new(generator: G, problem: SearchProblem, config: EngineConfig) -> Result<Self> {
        let sandbox = Sandbox::new(config.sandbox.clone());
        Self::with_evaluator(generator, sandbox, problem, config)
    }
}

impl<G: CandidateGenerator, E: Evaluator> SearchEngine<G, E> {
    pub fn with_evaluator(
        generator: G,
        evaluator: E,
        problem: SearchProblem,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let rng = match config.search.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let tree = SearchTree::new(problem.root_state());
        Ok(Self {
            generator,
            evaluator,
            problem,
            config: config.search,
            tree,
            rng,
        })
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn problem(&self) -> &SearchProblem {
        &self.problem
    }

    /// Search for up to `iterations` rollouts and return the final code.
    pub async fn run(&mut self, iterations: u32) -> String {
        self.search(iterations, |_| {}).await.code
    }

    /// Like [`run`](Self::run), reporting one progress line per iteration to
    /// `on_step` and returning the full outcome.
    pub async fn search<F>(&mut self, iterations: u32, on_step: F) -> SearchOutcome
    where
        F: FnMut(&str),
    {
        let run_id = Uuid::new_v4().to_string();
        let span = obs::search_span(&run_id);
        self.search_loop(&run_id, iterations, on_step)
            .instrument(span)
            .await
    }

    async fn search_loop<F>(
        &mut self,
        run_id: &str,
        iterations: u32,
        mut on_step: F,
    ) -> SearchOutcome
    where
        F: FnMut(&str),
    {
        obs::emit_search_started(run_id, iterations, self.tree.root().state.len());

        // Solved by an earlier call: terminal nodes are never simulated again.
        if let Some(solved) = self.tree.terminal_node() {
            let depth = self.tree.depth(solved);
            obs::emit_solution_found(run_id, 0, depth);
            return SearchOutcome {
                code: self.tree.get(solved).state.clone(),
                solved: true,
                iterations_used: 0,
                depth,
                tree_size: self.tree.len(),
            };
        }

        for iteration in 1..=iterations {
            let selected = self.select();
            let node = if self.should_expand(selected) {
                self.expand(selected).await
            } else {
                selected
            };

            let reward = self.simulate(node).await;
            self.tree.backpropagate(node, reward);

            let depth = self.tree.depth(node);
            obs::emit_iteration(iteration, depth, reward, self.tree.len());

            let solved = reward >= REWARD_SUCCESS;
            on_step(&progress_line(
                iteration,
                depth,
                reward,
                &self.tree.get(node).state,
                solved,
            ));

            if solved {
                obs::emit_solution_found(run_id, iteration, depth);
                return SearchOutcome {
                    code: self.tree.get(node).state.clone(),
                    solved: true,
                    iterations_used: iteration,
                    depth,
                    tree_size: self.tree.len(),
                };
            }
        }

        obs::emit_budget_exhausted(run_id, iterations, self.tree.len());
        let best = self
            .tree
            .most_visited_child(SearchTree::ROOT)
            .unwrap_or(SearchTree::ROOT);
        SearchOutcome {
            code: self.tree.get(best).state.clone(),
            solved: false,
            iterations_used: iterations,
            depth: self.tree.depth(best),
            tree_size: self.tree.len(),
        }
    }

    /// Descend by UCB1 through fully expanded nodes.
    fn select(&self) -> NodeId {
        let mut id = SearchTree::ROOT;
        loop {
            let node = self.tree.get(id);
            if node.children.is_empty() || !node.is_fully_expanded {
                return id;
            }
            match self.tree.best_child(id, self.config.exploration_weight) {
                Some(child) => id = child,
                None => return id,
            }
        }
    }

    /// Expand only non-terminal nodes that already had their own rollout.
    fn should_expand(&self, id: NodeId) -> bool {
        let node = self.tree.get(id);
        !node.is_terminal && node.visits > 0
    }

    /// Add one child per candidate and return a random one to simulate.
    async fn expand(&mut self, id: NodeId) -> NodeId {
        let n = self.config.candidates_per_expansion;
        let state = self.tree.get(id).state.clone();
        let mut candidates = self
            .generator
            .generate_candidates(&self.problem.description, &state, n)
            .await;
        candidates.truncate(n);

        if candidates.is_empty() {
            obs::emit_empty_expansion(self.tree.depth(id));
            return id;
        }

        let children: Vec<NodeId> = candidates
            .iter()
            .map(|fragment| self.tree.add_child(id, join_state(&state, fragment)))
            .collect();
        self.tree.mark_fully_expanded(id);
        children[self.rng.gen_range(0..children.len())]
    }

    async fn simulate(&mut self, id: NodeId) -> f64 {
        let result = self
            .evaluator
            .evaluate(&self.tree.get(id).state, &self.problem.validation_script)
            .await;
        if result.success {
            self.tree.mark_terminal(id);
        }
        reward_for(&result)
    }
}
