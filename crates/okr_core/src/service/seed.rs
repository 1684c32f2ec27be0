//! Demo objectives for a fresh dashboard.

use crate::model::objective::{KeyResult, KeyResultType, Objective, ObjectiveStatus};

/// Three sample objectives with stable ids `obj_1..obj_3`.
pub fn demo_objectives() -> Vec<Objective> {
    vec![
        Objective {
            id: "obj_1".to_string(),
            title: "Launch Q3 Marketing Campaign".to_string(),
            description: "Execute a multi-channel marketing campaign to boost brand awareness and lead generation for the new product line.".to_string(),
            owner: "Marketing Team".to_string(),
            why_is_important: Some("This campaign is critical for establishing market presence for our new flagship product and achieving our revenue targets for the second half of the year.".to_string()),
            status: Some(ObjectiveStatus::OnTrack),
            key_results: vec![
                kr("kr_1_1", "Increase website traffic by 20%", "Measured by Google Analytics unique visitors.", KeyResultType::Percentage, 0.0, 20.0, 15.0),
                kr("kr_1_2", "Generate 500 new MQLs", "Tracked via HubSpot form submissions.", KeyResultType::Numeric, 0.0, 500.0, 350.0),
                kr("kr_1_3", "Achieve a 5% conversion rate on landing pages", "A/B test results from Optimizely.", KeyResultType::Percentage, 0.0, 5.0, 4.2),
            ],
            q2_status_update: Some("Campaign planning complete. All assets are ready for launch. Initial outreach has begun with positive feedback.".to_string()),
            q3_status_update: Some("Campaign is live across all channels. Lead generation is exceeding targets by 15%. Website traffic is up 18%.".to_string()),
            final_status_update: None,
        },
        Objective {
            id: "obj_2".to_string(),
            title: "Enhance Customer Onboarding Experience".to_string(),
            description: "Improve the initial user experience to increase activation rates and reduce early-stage churn.".to_string(),
            owner: "Product Team".to_string(),
            why_is_important: Some("A seamless onboarding is key to user retention. Improving this flow will directly impact long-term customer satisfaction and reduce support costs.".to_string()),
            status: Some(ObjectiveStatus::AtRisk),
            key_results: vec![
                kr("kr_2_1", "Reduce onboarding drop-off rate to 10%", "Funnel analysis in Mixpanel.", KeyResultType::Percentage, 25.0, 10.0, 12.0),
                kr("kr_2_2", "Increase user activation rate by 15%", "Calculated as users completing key action X within 3 days.", KeyResultType::Percentage, 0.0, 15.0, 10.0),
            ],
            q2_status_update: Some("Initial user testing of the new onboarding flow revealed some friction points. Iterating on designs before full implementation.".to_string()),
            q3_status_update: None,
            final_status_update: None,
        },
        Objective {
            id: "obj_3".to_string(),
            title: "Strengthen Engineering Infrastructure".to_string(),
            description: "Improve system reliability and performance to support growing user demand and ensure a stable platform.".to_string(),
            owner: "Engineering Team".to_string(),
            why_is_important: Some("A robust and scalable infrastructure is the foundation of our service. This work ensures we can maintain a high-quality user experience as we grow.".to_string()),
            status: Some(ObjectiveStatus::OnTrack),
            key_results: vec![
                kr("kr_3_1", "Achieve 99.9% uptime", "Monitored via Datadog SLOs.", KeyResultType::Percentage, 99.5, 99.9, 99.85),
                kr("kr_3_2", "Decrease average API response time to 150ms", "P95 latency measured by Cloudflare Analytics.", KeyResultType::Numeric, 250.0, 150.0, 180.0),
                kr("kr_3_3", "Resolve 50 P1/P2 bugs", "Count of tickets closed in Jira.", KeyResultType::Numeric, 0.0, 50.0, 45.0),
            ],
            q2_status_update: Some("Migrated primary database to a new cluster with zero downtime. Performance metrics are stable.".to_string()),
            q3_status_update: Some("Implemented new caching layer, resulting in a 20% decrease in average API response time. Uptime remains solid.".to_string()),
            final_status_update: Some("All infrastructure goals met. System is stable and scalable for the next 12 months.".to_string()),
        },
    ]
}

fn kr(
    id: &str,
    title: &str,
    how_it_is_measured: &str,
    kind: KeyResultType,
    start_value: f64,
    target_value: f64,
    current_value: f64,
) -> KeyResult {
    KeyResult {
        id: Some(id.to_string()),
        title: title.to_string(),
        how_it_is_measured: how_it_is_measured.to_string(),
        kind,
        start_value,
        target_value,
        current_value,
    }
}
