//! The ingredient container: a stack-like, ordered list of [`Ingredient`]s.
//!
//! The same structure backs the global ingredient table, every mixing bowl
//! and every baking dish (spec: "Ingredient container (used for globals and
//! for each bowl/dish)"). It is a thin ordered `Vec` rather than a keyed map
//! — assign-by-name is O(n), which the language's recipe-sized programs
//! never make a bottleneck.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::model::{Ingredient, IngredientProps};

/// An ordered, name-addressable stack of ingredients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IngredientList(Vec<Ingredient>);

impl IngredientList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.0.iter()
    }

    /// Pushes an ingredient onto the top.
    pub fn push(&mut self, ingredient: Ingredient) {
        self.0.push(ingredient);
    }

    /// Pops the top ingredient, if any.
    pub fn pop(&mut self) -> Option<Ingredient> {
        self.0.pop()
    }

    /// Removes every ingredient.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Appends a copy of `other`'s ingredients, in order, on top of this
    /// container's existing contents.
    pub fn extend_from(&mut self, other: &IngredientList) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Looks up an ingredient by name.
    ///
    /// If the name appears more than once (possible after evaluator stack
    /// operations, never within the parser-declared global table), the
    /// first match is returned, matching a linear list scan.
    pub fn get(&self, name: &str) -> Option<&Ingredient> {
        self.0.iter().find(|i| i.name == name)
    }

    /// Assigns `props` to the ingredient named `name`.
    ///
    /// If an ingredient with that name already exists, it is replaced in
    /// place at its current position, keeping the container's order
    /// otherwise unchanged. Else a new ingredient is appended.
    pub fn assign(&mut self, name: impl Into<String>, props: IngredientProps) {
        let name = name.into();
        if let Some(existing) = self.0.iter_mut().find(|i| i.name == name) {
            existing.props = props;
        } else {
            self.0.push(Ingredient::new(name, props));
        }
    }

    /// The top (last-pushed) ingredient, if any.
    pub fn top(&self) -> Option<&Ingredient> {
        self.0.last()
    }

    /// Rolls the top ingredient down `n` places, shifting everything above
    /// it up by one.
    ///
    /// `stir(0)` is the identity. If `n` is at least the container's
    /// length, the top ingredient ends up at the front.
    pub fn stir(&mut self, n: u32) {
        let Some(top) = self.0.pop() else {
            return;
        };
        let len = self.0.len();
        let n = n as usize;
        let index = if n >= len { 0 } else { len - n };
        self.0.insert(index, top);
    }

    /// Shuffles the container's contents using the given source of
    /// randomness.
    pub fn shuffle(&mut self, shuffler: &mut dyn crate::shuffle::Shuffler) {
        shuffler.shuffle(&mut self.0);
    }
}

impl FromIterator<Ingredient> for IngredientList {
    fn from_iter<I: IntoIterator<Item = Ingredient>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Flavor;
    use test_case::test_case;

    fn ingr(name: &str, value: i64) -> Ingredient {
        Ingredient::new(name, IngredientProps::new(Some(value), Flavor::Dry))
    }

    #[test]
    fn assign_replaces_in_place() {
        let mut list = IngredientList::new();
        list.push(ingr("a", 1));
        list.push(ingr("b", 2));
        list.push(ingr("c", 3));
        list.assign("b", IngredientProps::new(Some(99), Flavor::Liquid));
        let names: Vec<_> = list.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(list.get("b").unwrap().props.value, Some(99));
    }

    #[test]
    fn assign_appends_when_absent() {
        let mut list = IngredientList::new();
        list.assign("a", IngredientProps::new(Some(1), Flavor::Dry));
        assert_eq!(list.len(), 1);
        assert_eq!(list.get("a").unwrap().props.value, Some(1));
    }

    #[test_case(0, vec!["a", "b", "c"]; "stir 0 is identity")]
    #[test_case(1, vec!["a", "c", "b"]; "stir 1 swaps last two")]
    #[test_case(2, vec!["c", "a", "b"]; "stir len-1 puts top at front")]
    #[test_case(5, vec!["c", "a", "b"]; "stir over length puts top at front")]
    fn stir_rotation_law(n: u32, expected: Vec<&str>) {
        let mut list = IngredientList::new();
        list.push(ingr("a", 1));
        list.push(ingr("b", 2));
        list.push(ingr("c", 3));
        list.stir(n);
        let names: Vec<_> = list.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn stir_on_empty_is_noop() {
        let mut list = IngredientList::new();
        list.stir(3);
        assert!(list.is_empty());
    }

    #[test]
    fn extend_from_preserves_order_and_leaves_source_unchanged() {
        let mut bowl = IngredientList::new();
        bowl.push(ingr("a", 1));
        bowl.push(ingr("b", 2));
        let mut dish = IngredientList::new();
        dish.push(ingr("z", 0));
        dish.extend_from(&bowl);
        let names: Vec<_> = dish.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "b"]);
        assert_eq!(bowl.len(), 2);
    }

    #[test]
    fn pop_from_empty_is_none() {
        let mut list = IngredientList::new();
        assert!(list.pop().is_none());
    }

    #[test]
    fn top_on_empty_is_none() {
        let list = IngredientList::new();
        assert!(list.top().is_none());
    }
}
