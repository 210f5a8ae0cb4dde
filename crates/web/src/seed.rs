//! Synthetic recipe data for development databases.
//!
//! Each seeded recipe gets a random "<cooking method> <ingredient>" title and
//! constant placeholder content. Seeding is not idempotent: every run appends
//! another batch.

use rand::seq::IndexedRandom;

use crate::db::{RepositoryError, Store};
use crate::models::NewRecipe;

/// Number of recipes inserted when no count is given.
pub const DEFAULT_SEED_COUNT: usize = 50;

/// Cooking methods used as the first title word.
pub const COOKS: &[&str] = &[
    "Baked", "Blanched", "Braised", "Broiled", "Charred", "Confit", "Curried", "Fried",
    "Glazed", "Grilled", "Marinated", "Pan-Seared", "Pickled", "Poached", "Roasted",
    "Sauteed", "Smoked", "Steamed", "Stewed", "Stir-Fried",
];

/// Ingredients used as the second title word.
pub const INGREDIENTS: &[&str] = &[
    "Beef", "Brisket", "Chicken", "Chickpeas", "Cod", "Duck", "Eggplant", "Lamb", "Lentils",
    "Mushrooms", "Pork Belly", "Prawns", "Salmon", "Short Ribs", "Squash", "Tofu", "Trout",
    "Turkey", "Venison",
];

const SEED_IMAGE: &str = "https://source.unsplash.com/collection/1424340";
const SEED_AUTHOR: &str = "Super Admin";
const SEED_DESCRIPTION: &str = "Lorem ipsum dolor, sit amet consectetur adipisicing elit. \
    Repellat, quo nam, alias excepturi perferendis ipsa ex sapiente magni consectetur \
    blanditiis itaque officiis voluptate vero esse dolor, animi mollitia architecto earum?";
const SEED_STEPS: &str = "1. First\n2. Second\n 3. Third";

/// Build `count` synthetic recipes.
#[must_use]
pub fn sample_recipes(count: usize) -> Vec<NewRecipe> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let cook = COOKS.choose(&mut rng).copied().unwrap_or("Baked");
            let ingredient = INGREDIENTS.choose(&mut rng).copied().unwrap_or("Beef");
            NewRecipe {
                title: format!("{cook} {ingredient}"),
                image: Some(SEED_IMAGE.to_string()),
                author: Some(SEED_AUTHOR.to_string()),
                description: Some(SEED_DESCRIPTION.to_string()),
                steps: Some(SEED_STEPS.to_string()),
            }
        })
        .collect()
}

/// Insert `count` synthetic recipes and return how many were written.
///
/// # Errors
///
/// Returns `RepositoryError` on the first failed insert; earlier inserts stay.
pub async fn seed_recipes(store: &dyn Store, count: usize) -> Result<u64, RepositoryError> {
    let mut inserted = 0_u64;
    for recipe in sample_recipes(count) {
        store.insert_recipe(recipe).await?;
        inserted += 1;
    }

    tracing::info!(inserted, "seed finished");
    Ok(inserted)
}
