// Fixed prompt templates, one per analysis focus.
//
// Every template ends with the `{data}` placeholder, which the composer
// replaces with the CSV sample. Templates are static text: changing one
// changes every payload built for that focus.

use crate::focus::AnalysisFocus;

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful energy analyst.";

pub const DATA_PLACEHOLDER: &str = "{data}";

const ASSET_MANAGEMENT: &str = r#"You are an energy analyst supporting a portfolio asset manager.

Review the building energy data below and provide:
- Buildings or sites whose usage or cost stands out against the rest of the portfolio
- Trends over time that suggest equipment degradation, operational drift or seasonal inefficiency
- Candidate capital projects (HVAC, lighting, controls, envelope) with the evidence behind each
- Data quality issues that limit confidence in the findings

Keep the tone practical and concise. Use short sections with bullet points, quote figures from the data where they support a point, and say plainly when the data is not enough to draw a conclusion.

Data:
{data}"#;

const PROCUREMENT: &str = r#"You are an energy analyst advising an energy procurement team.

Review the building energy data below and provide:
- Total and average consumption and spend, and how they move across the period covered
- Effective unit cost (cost per unit of usage) by site where both usage and cost are present
- Load shape observations that matter for contract structure (baseload, seasonality, volatility)
- Procurement recommendations such as fixed versus index pricing, contract timing and budget risk

Write for a commercial audience: clear, numbers-first, no jargon without explanation. Flag any assumption you had to make about tariffs or units.

Data:
{data}"#;

const DEMAND_RESPONSE: &str = r#"You are an energy analyst assessing demand response potential.

Review the building energy data below and provide:
- Periods of peak consumption and how concentrated they are
- Sites with the largest flexible or sheddable load, and the likely sources of that flexibility
- Load shifting or curtailment strategies suited to the patterns in the data
- An estimate of the demand response opportunity, with the limits of what the data can show

Be specific and actionable. Keep each recommendation to one or two sentences and tie it to an observation in the data.

Data:
{data}"#;

const NEXT_BEST_ACTIONS: &str = r#"You are an energy analyst preparing a prioritized action plan.

Review the building energy data below and provide:
- The five next best actions to reduce energy usage or cost, most valuable first
- For each action: the site(s) it applies to, the expected impact, and the effort involved
- Quick wins that need no capital spend
- What additional data would sharpen these recommendations

Be direct and decisive. Present the actions as a numbered list and keep supporting detail brief.

Data:
{data}"#;

/// The fixed template for `focus`.
pub fn template(focus: AnalysisFocus) -> &'static str {
    match focus {
        AnalysisFocus::AssetManagement => ASSET_MANAGEMENT,
        AnalysisFocus::Procurement => PROCUREMENT,
        AnalysisFocus::DemandResponse => DEMAND_RESPONSE,
        AnalysisFocus::NextBestActions => NEXT_BEST_ACTIONS,
    }
}

/// Fill the template's data placeholder with `data`.
pub fn render(focus: AnalysisFocus, data: &str) -> String {
    template(focus).replacen(DATA_PLACEHOLDER, data, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_ends_with_placeholder() {
        for focus in AnalysisFocus::ALL {
            assert!(
                template(focus).ends_with(DATA_PLACEHOLDER),
                "{} template must end with the data placeholder",
                focus
            );
            assert_eq!(template(focus).matches(DATA_PLACEHOLDER).count(), 1);
        }
    }

    #[test]
    fn test_templates_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for focus in AnalysisFocus::ALL {
            assert!(seen.insert(template(focus)));
        }
    }

    #[test]
    fn test_render_inserts_data_once() {
        let out = render(AnalysisFocus::Procurement, "a,b\n1,2\n");
        assert!(out.ends_with("Data:\na,b\n1,2\n"));
        assert!(!out.contains(DATA_PLACEHOLDER));
    }

    #[test]
    fn test_render_leaves_placeholder_text_in_data_alone() {
        let out = render(AnalysisFocus::DemandResponse, "note\n{data}\n");
        assert!(out.ends_with("Data:\nnote\n{data}\n"));
    }

    #[test]
    fn test_templates_describe_their_focus() {
        assert!(template(AnalysisFocus::AssetManagement).contains("asset manager"));
        assert!(template(AnalysisFocus::Procurement).contains("procurement"));
        assert!(template(AnalysisFocus::DemandResponse).contains("demand response"));
        assert!(template(AnalysisFocus::NextBestActions).contains("next best actions"));
    }
}
