//! Walks a parsed [`Recipe`]'s instructions, maintaining the global
//! ingredient table, the mixing bowls and the baking dishes, and producing
//! output through an injected sink.
//!
//! Loops are driven by an explicit frame stack rather than recursion, so a
//! deeply nested recipe can't blow the Rust call stack the way the
//! original's recursive `eval_instruction` could.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::container::IngredientList;
use crate::error::{ContainerKind, RuntimeError, RuntimeErrorKind};
use crate::model::{ContainerId, Ingredient, IngredientProps, Op, Recipe};
use crate::shuffle::{RandShuffler, Shuffler};
use crate::text::verbs_match;

/// An active loop, tracked while its body is executing.
struct LoopFrame {
    /// Index of the instruction right after `LoopStart`, where each pass
    /// resumes.
    body_start: usize,
    /// Index of the `LoopEnd` instruction closing this loop.
    end: usize,
    /// The ingredient whose value is rechecked after each pass.
    counter: String,
}

/// The evaluator's injectable collaborators.
///
/// The interpreter has nothing resembling persisted configuration; this
/// exists purely to bundle the one collaborator `Mix` needs, the same way a
/// `CooklangParser` bundles its `Extensions`/`Converter` rather than taking
/// them as loose constructor arguments.
pub struct EvalOptions {
    pub shuffler: Box<dyn Shuffler>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            shuffler: Box::new(RandShuffler),
        }
    }
}

/// Evaluates a [`Recipe`]'s instructions against mixing bowls and baking
/// dishes, producing output through `Serves`.
pub struct Evaluator<'r> {
    recipe: &'r Recipe,
    globals: IngredientList,
    mixing_bowls: Vec<IngredientList>,
    baking_dishes: Vec<IngredientList>,
    shuffler: Box<dyn Shuffler>,
    loop_ends: HashMap<usize, usize>,
}

impl<'r> Evaluator<'r> {
    /// Builds an evaluator seeded with the recipe's declared ingredients,
    /// using the default thread-RNG-backed shuffler for `Mix`.
    pub fn new(recipe: &'r Recipe) -> Self {
        Self::with_options(recipe, EvalOptions::default())
    }

    /// Builds an evaluator with injected [`EvalOptions`], letting tests
    /// substitute a deterministic source of randomness for `Mix`.
    pub fn with_options(recipe: &'r Recipe, options: EvalOptions) -> Self {
        Self {
            recipe,
            globals: recipe.ingredients.clone(),
            mixing_bowls: vec![IngredientList::new()],
            baking_dishes: vec![IngredientList::new()],
            shuffler: options.shuffler,
            loop_ends: HashMap::new(),
        }
    }

    /// A read-only view of the global ingredient table, for inspection after
    /// a run (or a partial run that failed).
    pub fn globals(&self) -> &IngredientList {
        &self.globals
    }

    /// Runs every instruction to completion, then drains `Serves` into
    /// `output` if the recipe declares it.
    ///
    /// On error, whatever bowl/dish mutations already happened are kept;
    /// there is no partial-success rollback.
    #[tracing::instrument(skip_all)]
    pub fn run(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<(), RuntimeError> {
        self.exec_all(input)?;
        if let Some(diners) = self.recipe.serves {
            self.serve(diners, output)?;
        }
        Ok(())
    }

    fn exec_all(&mut self, input: &mut impl BufRead) -> Result<(), RuntimeError> {
        let len = self.recipe.instructions.len();
        let mut frames: Vec<LoopFrame> = Vec::new();
        let mut ip = 0usize;
        while ip < len {
            let instr = &self.recipe.instructions[ip];
            let lineno = Some(instr.lineno);
            match &instr.op {
                Op::LoopStart { verb, name } => {
                    let end = self.resolve_loop_end(ip, verb, lineno)?;
                    frames.push(LoopFrame {
                        body_start: ip + 1,
                        end,
                        counter: name.clone(),
                    });
                    ip += 1;
                }
                Op::LoopEnd { name, .. } => {
                    if let Some(decremented) = name {
                        self.decrement(decremented, lineno)?;
                    }
                    if let Some(frame) = frames.last().filter(|f| f.end == ip) {
                        let body_start = frame.body_start;
                        let counter = frame.counter.clone();
                        if self.is_nonzero(&counter, lineno)? {
                            ip = body_start;
                        } else {
                            frames.pop();
                            ip += 1;
                        }
                    } else {
                        ip += 1;
                    }
                }
                op => {
                    self.exec_simple(op, instr.lineno, input)?;
                    ip += 1;
                }
            }
        }
        Ok(())
    }

    fn resolve_loop_end(
        &mut self,
        start: usize,
        verb: &str,
        lineno: Option<u32>,
    ) -> Result<usize, RuntimeError> {
        if let Some(&end) = self.loop_ends.get(&start) {
            return Ok(end);
        }
        let instructions = &self.recipe.instructions;
        for (offset, instr) in instructions.iter().enumerate().skip(start + 1) {
            if let Op::LoopEnd { participle, .. } = &instr.op {
                if verbs_match(verb, participle) {
                    self.loop_ends.insert(start, offset);
                    return Ok(offset);
                }
            }
        }
        Err(RuntimeError::new(
            RuntimeErrorKind::MissingLoopEnd {
                verb: verb.to_string(),
            },
            lineno,
        ))
    }

    fn is_nonzero(&self, name: &str, lineno: Option<u32>) -> Result<bool, RuntimeError> {
        let ingredient = self.get_global(name, lineno)?;
        Ok(ingredient.props.value != Some(0))
    }

    fn decrement(&mut self, name: &str, lineno: Option<u32>) -> Result<(), RuntimeError> {
        let ingredient = self.get_global(name, lineno)?;
        let value = ingredient.props.value.unwrap_or(0) - 1;
        let flavor = ingredient.props.flavor;
        self.globals.assign(name, IngredientProps::new(Some(value), flavor));
        Ok(())
    }

    fn get_global(&self, name: &str, lineno: Option<u32>) -> Result<&Ingredient, RuntimeError> {
        self.globals.get(name).ok_or_else(|| {
            RuntimeError::new(
                RuntimeErrorKind::UndefinedIngredient {
                    name: name.to_string(),
                },
                lineno,
            )
        })
    }

    fn bowl_index(
        &self,
        id: Option<ContainerId>,
        lineno: Option<u32>,
    ) -> Result<usize, RuntimeError> {
        container_index(&self.mixing_bowls, ContainerKind::MixingBowl, id, lineno)
    }

    fn dish_index(
        &self,
        id: Option<ContainerId>,
        lineno: Option<u32>,
    ) -> Result<usize, RuntimeError> {
        container_index(&self.baking_dishes, ContainerKind::BakingDish, id, lineno)
    }

    fn exec_simple(
        &mut self,
        op: &Op,
        lineno: u32,
        input: &mut impl BufRead,
    ) -> Result<(), RuntimeError> {
        let ln = Some(lineno);
        match op {
            Op::Take { name } => self.take(name, ln, input),
            Op::Put { name, bowl } => self.put(name, *bowl, ln),
            Op::Fold { name, bowl } => self.fold(name, *bowl, ln),
            Op::Add { name, bowl } => self.calculate(|a, b| Ok(a + b), name, *bowl, ln),
            Op::Remove { name, bowl } => self.calculate(|a, b| Ok(a - b), name, *bowl, ln),
            Op::Combine { name, bowl } => self.calculate(|a, b| Ok(a * b), name, *bowl, ln),
            Op::Divide { name, bowl } => self.calculate(floor_div, name, *bowl, ln),
            Op::AddDry { bowl } => self.add_dry(*bowl, ln),
            Op::LiquefyIngredient { name } => self.liquefy_ingredient(name, ln),
            Op::LiquefyContents { bowl } => self.liquefy_contents(*bowl, ln),
            Op::StirMinutes { bowl, minutes } => self.stir_minutes(*bowl, *minutes, ln),
            Op::StirIngredient { name, bowl } => self.stir_ingredient(name, *bowl, ln),
            Op::Mix { bowl } => self.mix(*bowl, ln),
            Op::Clean { bowl } => self.clean(*bowl, ln),
            Op::Pour { bowl, dish } => self.pour(*bowl, *dish, ln),
            Op::Refrigerate { .. } => Ok(()),
            Op::LoopStart { .. } | Op::LoopEnd { .. } => unreachable!("handled by exec_all"),
        }
    }

    fn take(
        &mut self,
        name: &str,
        lineno: Option<u32>,
        input: &mut impl BufRead,
    ) -> Result<(), RuntimeError> {
        let mut line = String::new();
        input
            .read_line(&mut line)
            .map_err(|e| RuntimeError::new(RuntimeErrorKind::Io(e.to_string()), lineno))?;
        let trimmed = line.trim();
        let value: i64 = trimmed.parse().map_err(|_| {
            RuntimeError::new(
                RuntimeErrorKind::InvalidInput {
                    input: trimmed.to_string(),
                },
                lineno,
            )
        })?;
        let flavor = self.get_global(name, lineno)?.props.flavor;
        self.globals.assign(name, IngredientProps::new(Some(value), flavor));
        Ok(())
    }

    fn put(
        &mut self,
        name: &str,
        bowl_id: Option<ContainerId>,
        lineno: Option<u32>,
    ) -> Result<(), RuntimeError> {
        let idx = match self.bowl_index(bowl_id, lineno) {
            Ok(idx) => idx,
            // `put` is the only operation that recovers from an
            // out-of-range id, and only by exactly one past the current
            // count; anything else (including an id that was already < 1)
            // is reported as an id error rather than a plain "doesn't
            // exist", mirroring the original's `put` re-raising.
            Err(_) => {
                let requested = bowl_id.unwrap_or(1) as i64;
                if requested == self.mixing_bowls.len() as i64 + 1 {
                    self.mixing_bowls.push(IngredientList::new());
                    self.mixing_bowls.len() - 1
                } else {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::InvalidContainerId {
                            kind: ContainerKind::MixingBowl,
                            id: requested,
                        },
                        lineno,
                    ));
                }
            }
        };
        let ingredient = self.get_global(name, lineno)?.clone();
        self.mixing_bowls[idx].push(ingredient);
        Ok(())
    }

    fn fold(
        &mut self,
        name: &str,
        bowl_id: Option<ContainerId>,
        lineno: Option<u32>,
    ) -> Result<(), RuntimeError> {
        let idx = self.bowl_index(bowl_id, lineno)?;
        let top = self.mixing_bowls[idx].pop().ok_or_else(|| {
            RuntimeError::new(
                RuntimeErrorKind::EmptyContainer {
                    kind: ContainerKind::MixingBowl,
                    id: bowl_id.unwrap_or(1) as usize,
                },
                lineno,
            )
        })?;
        self.globals.assign(name, top.props);
        Ok(())
    }

    fn calculate(
        &mut self,
        op: impl Fn(i64, i64) -> Result<i64, RuntimeErrorKind>,
        name: &str,
        bowl_id: Option<ContainerId>,
        lineno: Option<u32>,
    ) -> Result<(), RuntimeError> {
        let operand = self.get_global(name, lineno)?.clone();
        let idx = self.bowl_index(bowl_id, lineno)?;
        let top = self.mixing_bowls[idx].top().cloned().ok_or_else(|| {
            RuntimeError::new(
                RuntimeErrorKind::EmptyContainer {
                    kind: ContainerKind::MixingBowl,
                    id: bowl_id.unwrap_or(1) as usize,
                },
                lineno,
            )
        })?;
        let top_value = top.props.value.unwrap_or(0);
        let operand_value = operand.props.value.unwrap_or(0);
        let result = op(top_value, operand_value).map_err(|kind| RuntimeError::new(kind, lineno))?;
        self.mixing_bowls[idx].assign(name, IngredientProps::new(Some(result), operand.props.flavor));
        Ok(())
    }

    fn add_dry(&mut self, bowl_id: Option<ContainerId>, lineno: Option<u32>) -> Result<(), RuntimeError> {
        let sum: i64 = self
            .globals
            .iter()
            .filter(|i| i.props.flavor.is_dry())
            .map(|i| i.props.value.unwrap_or(0))
            .sum();
        let idx = self.bowl_index(bowl_id, lineno)?;
        self.mixing_bowls[idx].push(Ingredient::new(
            String::new(),
            IngredientProps::new(Some(sum), crate::model::Flavor::Dry),
        ));
        Ok(())
    }

    fn liquefy_ingredient(&mut self, name: &str, lineno: Option<u32>) -> Result<(), RuntimeError> {
        let ingredient = self.get_global(name, lineno)?;
        let value = ingredient.props.value;
        self.globals
            .assign(name, IngredientProps::new(value, crate::model::Flavor::Liquid));
        Ok(())
    }

    fn liquefy_contents(
        &mut self,
        bowl_id: Option<ContainerId>,
        lineno: Option<u32>,
    ) -> Result<(), RuntimeError> {
        let idx = self.bowl_index(bowl_id, lineno)?;
        let liquefied: Vec<Ingredient> = self.mixing_bowls[idx]
            .iter()
            .map(|i| {
                Ingredient::new(
                    i.name.clone(),
                    IngredientProps::new(i.props.value, crate::model::Flavor::Liquid),
                )
            })
            .collect();
        self.mixing_bowls[idx] = liquefied.into_iter().collect();
        Ok(())
    }

    fn stir_minutes(
        &mut self,
        bowl_id: Option<ContainerId>,
        minutes: u32,
        lineno: Option<u32>,
    ) -> Result<(), RuntimeError> {
        let idx = self.bowl_index(bowl_id, lineno)?;
        self.mixing_bowls[idx].stir(minutes);
        Ok(())
    }

    fn stir_ingredient(
        &mut self,
        name: &str,
        bowl_id: Option<ContainerId>,
        lineno: Option<u32>,
    ) -> Result<(), RuntimeError> {
        let value = self.get_global(name, lineno)?.props.value.unwrap_or(0);
        let idx = self.bowl_index(bowl_id, lineno)?;
        self.mixing_bowls[idx].stir(value.max(0) as u32);
        Ok(())
    }

    fn mix(&mut self, bowl_id: Option<ContainerId>, lineno: Option<u32>) -> Result<(), RuntimeError> {
        let idx = self.bowl_index(bowl_id, lineno)?;
        self.mixing_bowls[idx].shuffle(self.shuffler.as_mut());
        Ok(())
    }

    fn clean(&mut self, bowl_id: Option<ContainerId>, lineno: Option<u32>) -> Result<(), RuntimeError> {
        let idx = self.bowl_index(bowl_id, lineno)?;
        self.mixing_bowls[idx].clear();
        Ok(())
    }

    fn pour(
        &mut self,
        bowl_id: Option<ContainerId>,
        dish_id: Option<ContainerId>,
        lineno: Option<u32>,
    ) -> Result<(), RuntimeError> {
        // Unlike `put`, `pour` never grows the baking dish list — there is
        // always exactly one baking dish unless a future opcode adds more.
        let bowl_idx = self.bowl_index(bowl_id, lineno)?;
        let dish_idx = self.dish_index(dish_id, lineno)?;
        let bowl = self.mixing_bowls[bowl_idx].clone();
        self.baking_dishes[dish_idx].extend_from(&bowl);
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    fn serve(&mut self, diners: u32, output: &mut impl Write) -> Result<(), RuntimeError> {
        for dish in self.baking_dishes.iter_mut().take(diners as usize) {
            while let Some(ingredient) = dish.pop() {
                let value = ingredient.props.value.unwrap_or(0);
                let io_err = |e: std::io::Error| RuntimeError::new(RuntimeErrorKind::Io(e.to_string()), None);
                if ingredient.props.flavor.is_liquid() {
                    let code_point = u32::try_from(value).unwrap_or(0);
                    if let Some(c) = char::from_u32(code_point) {
                        let mut buf = [0u8; 4];
                        output
                            .write_all(c.encode_utf8(&mut buf).as_bytes())
                            .map_err(io_err)?;
                    }
                } else {
                    output.write_all(value.to_string().as_bytes()).map_err(io_err)?;
                }
            }
        }
        output
            .flush()
            .map_err(|e| RuntimeError::new(RuntimeErrorKind::Io(e.to_string()), None))
    }
}

/// Resolves a 1-indexed, possibly-absent container id to a `Vec` index.
///
/// Strict: an id past the current count is always `NonExistingContainer`.
/// Only `Put` recovers from that by growing the mixing bowl list itself,
/// when the id is exactly one past the count.
fn container_index(
    containers: &[IngredientList],
    kind: ContainerKind,
    id: Option<ContainerId>,
    lineno: Option<u32>,
) -> Result<usize, RuntimeError> {
    let n = id.unwrap_or(1);
    if n < 1 {
        return Err(RuntimeError::new(
            RuntimeErrorKind::InvalidContainerId { kind, id: n as i64 },
            lineno,
        ));
    }
    let idx = (n - 1) as usize;
    if idx < containers.len() {
        Ok(idx)
    } else {
        Err(RuntimeError::new(
            RuntimeErrorKind::NonExistingContainer {
                kind,
                id: n as usize,
            },
            lineno,
        ))
    }
}

fn floor_div(a: i64, b: i64) -> Result<i64, RuntimeErrorKind> {
    if b == 0 {
        return Err(RuntimeErrorKind::DivisionByZero);
    }
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}
