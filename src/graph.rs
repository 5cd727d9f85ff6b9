// src/graph.rs
//
// Owned arena of elements, indexed by case-insensitive name.
// Built once from scraped rows; only the tier pass annotates it afterwards.

use std::collections::HashMap;

use crate::core::sanitize::{name_key, normalize_name};
use crate::specs::elements::RawElement;

pub type EntityId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipe {
    pub ingredients: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub recipes: Vec<Recipe>,
    pub image_url: Option<String>,
    pub local_image: Option<String>,
    /// Meaningful once `resolved` is set.
    pub tier: u32,
    pub resolved: bool,
}

impl Entity {
    fn new(name: String) -> Self {
        Self {
            name,
            recipes: Vec::new(),
            image_url: None,
            local_image: None,
            tier: 0,
            resolved: false,
        }
    }

    pub fn is_base(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct EntityGraph {
    entities: Vec<Entity>,
    index: HashMap<String, EntityId>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from scraped rows. Ingredients never seen as a row become placeholders.
    pub fn from_raw<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawElement>,
    {
        let mut g = Self::new();
        for row in rows {
            g.add_raw(row);
        }
        tracing::debug!(
            entities = g.len(),
            base = g.entities.iter().filter(|e| e.is_base()).count(),
            "graph built"
        );
        g
    }

    /// Merge one row: recipes append, the image is kept only if none is known yet.
    pub fn add_raw(&mut self, row: RawElement) -> Option<EntityId> {
        let id = self.insert(&row.name)?;
        if let Some(url) = row.image_url.filter(|u| !u.is_empty()) {
            let e = &mut self.entities[id];
            if e.image_url.is_none() {
                e.image_url = Some(url);
            }
        }
        for ingredients in row.recipes {
            self.add_recipe(id, ingredients);
        }
        Some(id)
    }

    /// Attach a recipe to `id`, creating placeholders for unknown ingredients.
    /// Ingredient names are normalized; empty names are dropped.
    pub fn add_recipe(&mut self, id: EntityId, ingredients: Vec<String>) {
        let mut names = Vec::with_capacity(ingredients.len());
        for raw in ingredients {
            let name = normalize_name(&raw);
            if name.is_empty() {
                continue;
            }
            if let Some(ing) = self.insert(&name) {
                names.push(self.entities[ing].name.clone());
            }
        }
        self.entities[id].recipes.push(Recipe { ingredients: names });
    }

    /// Id for `name`, inserting a bare entity if it is new. `None` for a blank name.
    pub fn insert(&mut self, name: &str) -> Option<EntityId> {
        let name = normalize_name(name);
        if name.is_empty() {
            return None;
        }
        let key = name_key(&name);
        if let Some(&id) = self.index.get(&key) {
            return Some(id);
        }
        let id = self.entities.len();
        self.entities.push(Entity::new(name));
        self.index.insert(key, id);
        Some(id)
    }

    /// Add a recipe without creating placeholders; unknown names stay dangling.
    pub fn add_recipe_unchecked(&mut self, id: EntityId, ingredients: &[&str]) {
        let ingredients = ingredients.iter().map(|s| normalize_name(s)).collect();
        self.entities[id].recipes.push(Recipe { ingredients });
    }

    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.index.get(&name_key(&normalize_name(name))).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.id_of(name).map(|id| &self.entities[id])
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id]
    }

    pub fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id]
    }

    /// Entities in discovery order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Quick graph literal for tests and benches: `(name, recipes)` pairs.
/// Ingredients not listed as a name stay dangling.
impl<'a> FromIterator<(&'a str, Vec<Vec<&'a str>>)> for EntityGraph {
    fn from_iter<T: IntoIterator<Item = (&'a str, Vec<Vec<&'a str>>)>>(iter: T) -> Self {
        let items: Vec<_> = iter.into_iter().collect();
        let mut g = EntityGraph::new();
        for (name, _) in &items {
            g.insert(name);
        }
        for (name, recipes) in items {
            if let Some(id) = g.id_of(name) {
                for r in recipes {
                    g.add_recipe_unchecked(id, &r);
                }
            }
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, img: Option<&str>, recipes: &[&[&str]]) -> RawElement {
        RawElement {
            name: name.to_string(),
            image_url: img.map(str::to_string),
            recipes: recipes
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn ingredients_become_placeholders() {
        let g = EntityGraph::from_raw(vec![raw("Steam", None, &[&["Water", "Fire"]])]);
        assert_eq!(g.len(), 3);
        let water = g.get("Water").unwrap();
        assert!(water.is_base());
        assert_eq!(water.image_url, None);
    }

    #[test]
    fn names_are_matched_case_insensitively() {
        let g = EntityGraph::from_raw(vec![
            raw("Steam", None, &[&["water", "FIRE"]]),
            raw("Water", Some("https://x/water.png"), &[]),
        ]);
        assert_eq!(g.len(), 3);
        // first spelling wins
        assert_eq!(g.get("WATER").unwrap().name, "water");
        assert_eq!(g.entity(g.id_of("Steam").unwrap()).recipes[0].ingredients, vec!["water", "FIRE"]);
    }

    #[test]
    fn repeated_rows_merge_recipes_and_keep_first_image() {
        let g = EntityGraph::from_raw(vec![
            raw("Mud", Some("https://x/mud1.png"), &[&["Water", "Earth"]]),
            raw("Mud", Some("https://x/mud2.png"), &[&["Rain", "Soil"]]),
        ]);
        let mud = g.get("Mud").unwrap();
        assert_eq!(mud.recipes.len(), 2);
        assert_eq!(mud.image_url.as_deref(), Some("https://x/mud1.png"));
    }

    #[test]
    fn placeholder_picks_up_image_from_later_row() {
        let g = EntityGraph::from_raw(vec![
            raw("Steam", None, &[&["Water", "Fire"]]),
            raw("Water", Some("https://x/water.png"), &[]),
        ]);
        assert_eq!(g.get("Water").unwrap().image_url.as_deref(), Some("https://x/water.png"));
    }

    #[test]
    fn whitespace_is_normalized() {
        let g = EntityGraph::from_raw(vec![raw("  Steam \n Engine ", None, &[&[" Steam", "Metal "]])]);
        assert!(g.get("Steam Engine").is_some());
        assert!(g.get("steam").is_some());
        assert!(g.get("metal").is_some());
    }

    #[test]
    fn literal_keeps_unknown_names_dangling() {
        let g: EntityGraph = [("A", vec![vec!["Ghost", "B"]]), ("B", vec![])].into_iter().collect();
        assert_eq!(g.len(), 2);
        assert!(g.get("Ghost").is_none());
    }
}
