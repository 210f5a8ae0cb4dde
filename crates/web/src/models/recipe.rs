//! Recipe and review document types.

use chrono::{DateTime, Utc};

use recipe_book_core::{Rating, RecipeId, ReviewId};

/// A recipe document.
///
/// `comments` holds references to [`Review`] documents in the order they were
/// added. The referenced reviews are separate documents; use
/// [`RecipeWithReviews`] when the resolved records are needed.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub image: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub steps: Option<String>,
    pub comments: Vec<ReviewId>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub image: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub steps: Option<String>,
}

impl NewRecipe {
    /// Materialize the document with a fresh ID and an empty comment list.
    #[must_use]
    pub fn into_recipe(self) -> Recipe {
        Recipe {
            id: RecipeId::generate(),
            title: self.title,
            image: self.image,
            author: self.author,
            description: self.description,
            steps: self.steps,
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A review (comment) document.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: ReviewId,
    pub rating: Option<Rating>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new review.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub rating: Option<Rating>,
    pub body: String,
}

impl NewReview {
    /// Materialize the document with a fresh ID.
    #[must_use]
    pub fn into_review(self) -> Review {
        Review {
            id: ReviewId::generate(),
            rating: self.rating,
            body: self.body,
            created_at: Utc::now(),
        }
    }
}

/// A recipe with its comment references resolved to full review records.
///
/// References whose review no longer exists are skipped, so `reviews.len()`
/// can be smaller than `recipe.comments.len()`.
#[derive(Debug, Clone)]
pub struct RecipeWithReviews {
    pub recipe: Recipe,
    pub reviews: Vec<Review>,
}
