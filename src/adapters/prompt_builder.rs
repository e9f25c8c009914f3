use tera::{Context, Tera};

use crate::domain::MirageError;

const TEMPLATE_NAME: &str = "generator_prompt";

/// Instruction template sent to the model. The schema is inserted verbatim.
const GENERATOR_PROMPT: &str = r#"You are a code generation engine.
Input Schema: {{ schema }}

Task: Write the BODY of a Rhai function that builds an object map called `data` matching the schema with random values.

Constraints:
1. Do NOT write a function signature such as 'fn dynamic_generator() {'.
2. Do NOT write markdown or code fences.
3. ONLY write the statements inside the function body.
4. Use the provided 'random', 'time', 'uuid' and 'fake' modules for every generated value.
5. Final line MUST be 'return data;'.

Available modules (already imported):
- random::int(min, max), random::float(min, max), random::bool(), random::choice(array), random::digits(n)
- time::now(), time::today(), time::days_from_now(n), time::timestamp(), time::recent(days)
- uuid::v4()
- fake::name(), fake::first_name(), fake::last_name(), fake::username(), fake::email(), fake::phone(),
  fake::city(), fake::country(), fake::street(), fake::word(), fake::sentence(), fake::paragraph(), fake::company()

Rhai syntax reminders: declare variables with 'let', object maps are written #{ key: value }, arrays are written [a, b], statements end with ';'.
"#;

/// Renders the generator instruction prompt for a user schema
pub struct PromptBuilder {
    tera: Tera,
}

impl PromptBuilder {
    pub fn new() -> Result<Self, MirageError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(TEMPLATE_NAME, GENERATOR_PROMPT)
            .map_err(|e| MirageError::Prompt(e.to_string()))?;
        Ok(Self { tera })
    }

    /// Embeds `schema` into the instruction template. The schema is never parsed.
    pub fn build(&self, schema: &str) -> Result<String, MirageError> {
        let mut context = Context::new();
        context.insert("schema", schema);
        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| MirageError::Prompt(e.to_string()))
    }
}
