//! Prompt construction for the generation pipeline.

use std::collections::BTreeMap;

use crate::ai::Message;

use super::complexity::ComplexityLevel;
use super::estimator::EstimateRequest;

/// Messages for the stage-1 vision analysis over the prior artwork.
pub fn analysis_messages(views: &BTreeMap<String, String>, instruction: &str) -> Vec<Message> {
    let slots: Vec<&str> = views.keys().map(String::as_str).collect();
    let urls: Vec<String> = views.values().cloned().collect();

    vec![
        Message::system(
            "You are a senior apparel technical designer. You describe product \
             artwork precisely and factually.",
        ),
        Message::user_with_images(
            format!(
                "These images show the {} views of one product. Describe the design \
                 elements relevant to applying this edit, so the edit can be applied \
                 consistently across all views. Keep it under 150 words.\n\nEdit: {}",
                slots.join("/"),
                instruction
            ),
            urls,
        ),
    ]
}

/// Messages for the stage-2 enhancement of the raw instruction.
pub fn enhancement_messages(analysis: &str, instruction: &str) -> Vec<Message> {
    vec![
        Message::system(
            "You rewrite product edit instructions to be specific and unambiguous. \
             Answer with the rewritten instruction only.",
        ),
        Message::user(format!(
            "Current product analysis:\n{}\n\nOriginal instruction: {}\n\n\
             Rewrite the instruction so an image model applies exactly this change \
             and nothing else, preserving every other design element.",
            analysis, instruction
        )),
    ]
}

/// The per-slot synthesis prompt: the refined instruction plus the slot
/// qualifier the renderer keys on.
pub fn synthesis_prompt(refined_instruction: &str, slot: &str) -> String {
    format!(
        "{} VIEW of the product. Apply the following edit while keeping every \
         other element identical to the reference image: {}",
        slot.to_uppercase(),
        refined_instruction
    )
}

/// Messages for the cost-estimation call. The arithmetic rules are stated
/// so the model's breakdown stays near what the caller recomputes.
pub fn estimate_messages(request: &EstimateRequest, complexity: ComplexityLevel) -> Vec<Message> {
    let material_line = match request.known_material_cost {
        Some(cost) => format!("Known total material cost per unit: ${:.2}. Use it as the base.", cost),
        None => "No material cost is known. Estimate a per-unit base from typical price ranges \
                 for each listed material type."
            .to_string(),
    };

    vec![
        Message::system(
            "You are a manufacturing cost analyst. Answer with a single JSON object \
             and no surrounding text.",
        ),
        Message::user(format!(
            "Estimate manufacturing costs for this product.\n\
             Name: {name}\n\
             Category: {category}\n\
             Materials: {materials}\n\
             Hardware: {hardware}\n\
             Dimensions: {dimensions}\n\
             Complexity level: {complexity}\n\
             {material_line}\n\n\
             Rules: report the per-unit material base as material_cost_base. Sample \
             materials cost is the base times 1.5; production (1000 units) materials \
             cost is the base times 0.65 per unit. Labor and tooling must fit the \
             {complexity} complexity band. Include sample and production lead times \
             in days, regional price multipliers for china/india/vietnam/usa, and a \
             confidence of low, medium, or high.\n\n\
             Respond with JSON: {{\"material_cost_base\": number, \
             \"complexity_level\": string, \
             \"sample_cost\": {{\"materials\": number, \"labor\": number, \"tooling\": number, \"total\": number}}, \
             \"production_cost\": {{\"materials\": number, \"labor\": number, \"tooling\": number, \"total\": number}}, \
             \"lead_times\": {{\"sample_days\": integer, \"production_days\": integer}}, \
             \"regional_multipliers\": {{string: number}}, \
             \"confidence\": string}}",
            name = request.product_name,
            category = request.category,
            materials = request.materials.join(", "),
            hardware = request.hardware.join(", "),
            dimensions = request.dimensions.as_deref().unwrap_or("unspecified"),
            complexity = complexity.as_str(),
            material_line = material_line,
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_messages_carry_all_views() {
        let mut views = BTreeMap::new();
        views.insert("front".to_string(), "https://cdn.test/f.png".to_string());
        views.insert("back".to_string(), "https://cdn.test/b.png".to_string());

        let messages = analysis_messages(&views, "change color to red");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].image_urls.len(), 2);
        assert!(messages[1].text.contains("back/front"));
        assert!(messages[1].text.contains("change color to red"));
    }

    #[test]
    fn test_synthesis_prompt_has_slot_qualifier() {
        let prompt = synthesis_prompt("make the body crimson", "front");
        assert!(prompt.starts_with("FRONT VIEW"));
        assert!(prompt.contains("make the body crimson"));
    }

    #[test]
    fn test_estimate_messages_state_known_cost() {
        let request = EstimateRequest {
            entity_id: "p1".to_string(),
            product_name: "Tote".to_string(),
            category: "bags".to_string(),
            known_material_cost: Some(12.5),
            materials: vec!["canvas".to_string()],
            hardware: vec!["zipper".to_string()],
            dimensions: None,
            force_refresh: false,
        };
        let messages = estimate_messages(&request, ComplexityLevel::Low);
        assert!(messages[1].text.contains("$12.50"));
        assert!(messages[1].text.contains("Complexity level: low"));
        assert!(messages[1].text.contains("material_cost_base"));
    }
}
