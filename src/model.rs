//! Recipe representation: the output of the parser and the input to the
//! evaluator.

#[cfg(feature = "serde")]
use serde::Serialize;

/// The dry/liquid/unknown tri-state attached to an ingredient.
///
/// The original language encodes this as two booleans (`is_dry`,
/// `is_liquid`) which are never both true and, for measures like `cup`,
/// both simultaneously unknown. A three-way enum is a lossless rendering of
/// that and rules out the "both true" state the booleans could otherwise
/// represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Flavor {
    Dry,
    Liquid,
    #[default]
    Unknown,
}

impl Flavor {
    pub fn is_dry(self) -> bool {
        self == Flavor::Dry
    }

    pub fn is_liquid(self) -> bool {
        self == Flavor::Liquid
    }
}

/// The mutable properties of an ingredient: its value and its flavor.
///
/// `value` is absent when an ingredient was declared without an initial
/// quantity; that is distinct from a value of `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IngredientProps {
    pub value: Option<i64>,
    pub flavor: Flavor,
}

impl IngredientProps {
    pub fn new(value: Option<i64>, flavor: Flavor) -> Self {
        Self { value, flavor }
    }
}

/// A named ingredient together with its current properties.
///
/// This is the element type of every [`crate::container::IngredientList`]:
/// the global table, every mixing bowl, and every baking dish.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Ingredient {
    pub name: String,
    pub props: IngredientProps,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, props: IngredientProps) -> Self {
        Self {
            name: name.into(),
            props,
        }
    }
}

/// A cooking time declaration, e.g. `Cooking time: 30 minutes.`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CookingTime {
    pub amount: u32,
    pub unit: TimeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TimeUnit {
    Minute,
    Hour,
}

/// An oven temperature declaration, e.g. `Pre-heat oven to 180 degrees
/// Celsius (gas mark 4).`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OvenTemperature {
    pub celsius: u32,
    pub gas_mark: Option<u32>,
}

/// A 1-indexed ordinal identifier naming a specific mixing bowl or baking
/// dish, e.g. the `2nd` in `Clean the 2nd mixing bowl.`. Absent means "the
/// 1st" at the call site.
pub type ContainerId = u32;

/// A single parsed step of the recipe's method, together with the source
/// line it came from.
///
/// Every opcode in the language carries a line number for error reporting;
/// rather than repeating a `lineno` field on every [`Op`] variant, it is
/// hoisted once onto the instruction itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Instruction {
    pub lineno: u32,
    pub op: Op,
}

impl Instruction {
    pub fn new(lineno: u32, op: Op) -> Self {
        Self { lineno, op }
    }
}

/// The operation an [`Instruction`] performs, per spec.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Op {
    Take {
        name: String,
    },
    Put {
        name: String,
        bowl: Option<ContainerId>,
    },
    Fold {
        name: String,
        bowl: Option<ContainerId>,
    },
    Add {
        name: String,
        bowl: Option<ContainerId>,
    },
    Remove {
        name: String,
        bowl: Option<ContainerId>,
    },
    Combine {
        name: String,
        bowl: Option<ContainerId>,
    },
    Divide {
        name: String,
        bowl: Option<ContainerId>,
    },
    AddDry {
        bowl: Option<ContainerId>,
    },
    LiquefyIngredient {
        name: String,
    },
    LiquefyContents {
        bowl: Option<ContainerId>,
    },
    StirMinutes {
        bowl: Option<ContainerId>,
        minutes: u32,
    },
    StirIngredient {
        name: String,
        bowl: Option<ContainerId>,
    },
    Mix {
        bowl: Option<ContainerId>,
    },
    Clean {
        bowl: Option<ContainerId>,
    },
    Pour {
        bowl: Option<ContainerId>,
        dish: Option<ContainerId>,
    },
    Refrigerate {
        hours: Option<u32>,
    },
    LoopStart {
        verb: String,
        name: String,
    },
    LoopEnd {
        participle: String,
        name: Option<String>,
    },
}

/// A fully parsed Chef recipe, ready for evaluation.
///
/// Produced once by [`crate::parser::parse`] and immutable thereafter; the
/// evaluator only ever mutates its own copies of the ingredient table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Recipe {
    pub title: String,
    pub ingredients: crate::container::IngredientList,
    pub cooking_time: Option<CookingTime>,
    pub oven_temperature: Option<OvenTemperature>,
    pub instructions: Vec<Instruction>,
    pub serves: Option<u32>,
}
