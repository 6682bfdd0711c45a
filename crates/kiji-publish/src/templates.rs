//! Template engine for the listing card fragment.

use minijinja::{AutoEscape, Environment};

use crate::escape::html_escape;
use crate::listing::ListingCard;

/// Template engine using minijinja.
///
/// Auto-escaping is off; templates escape explicitly with the `html` filter so
/// paths keep their slashes.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("html", |value: String| html_escape(&value));

        env.add_template_owned("card.html".to_string(), CARD_TEMPLATE.to_string())
            .expect("Failed to add card template");

        Self { env }
    }

    /// Render the listing card for a new article.
    pub fn render_card(&self, card: &ListingCard) -> Result<String, minijinja::Error> {
        self.env.get_template("card.html")?.render(card)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

// Indentation matches the grid's children in the listing page.
const CARD_TEMPLATE: &str = r#"
                    <!-- コラム記事 -->
                    <div class="bg-white rounded-lg shadow-lg overflow-hidden">
                        <a href="{{ href | html }}" class="block group">
                            <img src="{{ thumbnail | html }}" alt="{{ title | html }}" class="w-full h-48 object-cover group-hover:opacity-80 transition-opacity">
                            <div class="p-6">
                                <p class="text-sm text-gray-500 mb-2">{{ date | html }}</p>
                                <h4 class="font-bold text-lg mb-2 group-hover:text-blue-800">{{ title | html }}</h4>
                                <p class="text-gray-600 text-sm leading-relaxed">{{ description | html }}</p>
                            </div>
                        </a>
                    </div>"#;
