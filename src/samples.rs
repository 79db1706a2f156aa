//! Built-in recipes shown when the API cannot be reached.

use crate::models::Recipe;
use once_cell::sync::Lazy;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

static SAMPLE_RECIPES: Lazy<Vec<Recipe>> = Lazy::new(|| {
    vec![
        Recipe {
            id: "1".to_string(),
            name: "Classic Margherita Pizza".to_string(),
            description: Some("Thin crust, San Marzano tomatoes and fresh basil.".to_string()),
            image: "/images/margherita.jpg".to_string(),
            cuisine: "Italian".to_string(),
            diet: "Vegetarian".to_string(),
            cook_time: 30,
            difficulty: "Easy".to_string(),
            servings: 4,
            ingredients: lines(&[
                "pizza dough",
                "san marzano tomatoes",
                "fresh mozzarella",
                "basil leaves",
                "olive oil",
            ]),
            instructions: lines(&[
                "Preheat the oven to its highest setting.",
                "Stretch the dough and spread crushed tomatoes over it.",
                "Top with torn mozzarella and bake until blistered.",
                "Finish with basil and a drizzle of olive oil.",
            ]),
            notes: "A pizza stone gives the crispiest base.".to_string(),
            tags: lines(&["pizza", "baking", "classic"]),
        },
        Recipe {
            id: "2".to_string(),
            name: "Thai Green Curry".to_string(),
            description: Some("Fragrant coconut curry with vegetables.".to_string()),
            image: "/images/green-curry.jpg".to_string(),
            cuisine: "Thai".to_string(),
            diet: "Vegan".to_string(),
            cook_time: 40,
            difficulty: "Medium".to_string(),
            servings: 4,
            ingredients: lines(&[
                "green curry paste",
                "coconut milk",
                "tofu",
                "thai eggplant",
                "thai basil",
            ]),
            instructions: lines(&[
                "Fry the curry paste in a little coconut cream until fragrant.",
                "Add the remaining coconut milk and bring to a simmer.",
                "Add tofu and eggplant and cook until tender.",
                "Stir in thai basil and serve with jasmine rice.",
            ]),
            notes: "Adjust the heat with more or less paste.".to_string(),
            tags: lines(&["curry", "spicy", "weeknight"]),
        },
        Recipe {
            id: "3".to_string(),
            name: "Chicken Tikka Masala".to_string(),
            description: Some("Charred chicken in a creamy spiced tomato sauce.".to_string()),
            image: "/images/tikka-masala.jpg".to_string(),
            cuisine: "Indian".to_string(),
            diet: "Non-Vegetarian".to_string(),
            cook_time: 50,
            difficulty: "Medium".to_string(),
            servings: 4,
            ingredients: lines(&[
                "chicken thighs",
                "yogurt",
                "garam masala",
                "tomato puree",
                "cream",
            ]),
            instructions: lines(&[
                "Marinate the chicken in yogurt and spices.",
                "Grill until charred at the edges.",
                "Simmer tomato puree with spices, then add cream.",
                "Combine chicken and sauce and simmer for ten minutes.",
            ]),
            notes: "Marinate overnight for the best flavour.".to_string(),
            tags: lines(&["curry", "chicken", "comfort"]),
        },
    ]
});

/// The fixed fallback set of three recipes.
pub fn sample_recipes() -> Vec<Recipe> {
    SAMPLE_RECIPES.clone()
}
