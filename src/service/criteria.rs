//! Search predicate composition.
//!
//! Each optional filter becomes at most one [`Criterion`]; the active ones
//! form a [`RecipeCriteria`] conjunction. Stores either render the criteria
//! to SQL or evaluate them in memory with [`RecipeCriteria::apply`].

use std::collections::HashSet;

use crate::types::recipe::Recipe;

/// Optional search inputs. Empty term lists mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub vegetarian: Option<bool>,
    pub servings: Option<i32>,
    pub included_ingredients: Vec<String>,
    pub excluded_ingredients: Vec<String>,
    pub instruction: Option<String>,
}

/// Single search condition. Text payloads are already lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Vegetarian(bool),
    Servings(i32),
    InstructionContains(String),
    /// At least one ingredient name contains any of the terms.
    HasAnyIngredient(Vec<String>),
    /// Recipe is absent from the set matched by `HasAnyIngredient` over the terms.
    LacksAnyIngredient(Vec<String>),
}

fn vegetarian(value: Option<bool>) -> Option<Criterion> {
    value.map(Criterion::Vegetarian)
}

fn servings(value: Option<i32>) -> Option<Criterion> {
    value.map(Criterion::Servings)
}

fn instruction(keyword: Option<&str>) -> Option<Criterion> {
    keyword
        .filter(|k| !k.trim().is_empty())
        .map(|k| Criterion::InstructionContains(fold_case(k)))
}

fn ingredient_terms(terms: &[String]) -> Option<Vec<String>> {
    let terms: Vec<String> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| fold_case(t))
        .collect();
    (!terms.is_empty()).then_some(terms)
}

fn included(terms: &[String]) -> Option<Criterion> {
    ingredient_terms(terms).map(Criterion::HasAnyIngredient)
}

fn excluded(terms: &[String]) -> Option<Criterion> {
    ingredient_terms(terms).map(Criterion::LacksAnyIngredient)
}

fn has_any_ingredient(recipe: &Recipe, terms: &[String]) -> bool {
    recipe.ingredients.iter().any(|ingredient| {
        let name = fold_case(&ingredient.name);
        terms.iter().any(|term| name.contains(term.as_str()))
    })
}

impl Criterion {
    /// Evaluates a per-record condition. Exclusion is resolved as an
    /// anti-join in [`RecipeCriteria::apply`], not here.
    fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Self::Vegetarian(v) => recipe.vegetarian == *v,
            Self::Servings(n) => recipe.servings == *n,
            Self::InstructionContains(keyword) => {
                fold_case(&recipe.instruction).contains(keyword.as_str())
            }
            Self::HasAnyIngredient(terms) => has_any_ingredient(recipe, terms),
            Self::LacksAnyIngredient(terms) => !has_any_ingredient(recipe, terms),
        }
    }
}

/// Conjunction of criteria in a fixed order: vegetarian, servings,
/// instruction, included ingredients, excluded ingredients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeCriteria {
    criteria: Vec<Criterion>,
}

impl RecipeCriteria {
    pub fn from_filter(filter: &RecipeFilter) -> Self {
        let criteria = [
            vegetarian(filter.vegetarian),
            servings(filter.servings),
            instruction(filter.instruction.as_deref()),
            included(&filter.included_ingredients),
            excluded(&filter.excluded_ingredients),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self { criteria }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Filters `candidates` down to the recipes matching every criterion.
    ///
    /// Exclusion first collects the ids of all candidates owning a matching
    /// ingredient, then keeps only ids outside that set.
    pub fn apply<'a>(&self, candidates: impl IntoIterator<Item = &'a Recipe>) -> Vec<&'a Recipe> {
        let mut remaining: Vec<&Recipe> = candidates.into_iter().collect();
        for criterion in &self.criteria {
            match criterion {
                Criterion::LacksAnyIngredient(terms) => {
                    let matched: HashSet<i64> = remaining
                        .iter()
                        .filter(|r| has_any_ingredient(r, terms))
                        .map(|r| r.id)
                        .collect();
                    remaining.retain(|r| !matched.contains(&r.id));
                }
                other => remaining.retain(|r| other.matches(r)),
            }
        }
        remaining
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.criteria.iter().all(|c| c.matches(recipe))
    }
}

/// Case folding shared by search terms and the stored `*_folded` columns.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Escapes a lowercased term for `LIKE ... ESCAPE '\'` and wraps it in wildcards.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
