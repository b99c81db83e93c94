//! Demo data for trying the board out

use anyhow::{Context, Result};
use rusqlite::Connection;
use crate::models::{Lead, Priority, Stage};
use crate::repo::LeadRepo;

struct DemoLead {
    name: &'static str,
    company: &'static str,
    email: &'static str,
    assignee: &'static str,
    source: &'static str,
    value_dollars: i64,
    stage: Stage,
    priority: Priority,
    idle_days: i64,
    tags: &'static [&'static str],
}

const DEMO_LEADS: &[DemoLead] = &[
    DemoLead { name: "Sarah Chen", company: "Northwind Traders", email: "sarah.chen@northwind.example", assignee: "maria", source: "website", value_dollars: 12_000, stage: Stage::New, priority: Priority::Medium, idle_days: 1, tags: &[] },
    DemoLead { name: "James Okafor", company: "Bluebird Logistics", email: "j.okafor@bluebird.example", assignee: "dev", source: "referral", value_dollars: 45_000, stage: Stage::New, priority: Priority::High, idle_days: 0, tags: &["enterprise"] },
    DemoLead { name: "Lena Fischer", company: "Alpenrot GmbH", email: "lena@alpenrot.example", assignee: "sam", source: "event", value_dollars: 8_500, stage: Stage::Contacted, priority: Priority::Low, idle_days: 6, tags: &["emea"] },
    DemoLead { name: "Marcus Reid", company: "Reid & Sons Hardware", email: "marcus@reidsons.example", assignee: "maria", source: "cold-call", value_dollars: 3_200, stage: Stage::Contacted, priority: Priority::Medium, idle_days: 12, tags: &[] },
    DemoLead { name: "Priya Natarajan", company: "Kestrel Analytics", email: "priya@kestrel.example", assignee: "dev", source: "linkedin", value_dollars: 27_500, stage: Stage::Qualified, priority: Priority::High, idle_days: 3, tags: &["saas"] },
    DemoLead { name: "Tom Alvarez", company: "Sunset Dental Group", email: "tom.alvarez@sunsetdental.example", assignee: "sam", source: "website", value_dollars: 9_800, stage: Stage::Qualified, priority: Priority::Medium, idle_days: 9, tags: &[] },
    DemoLead { name: "Hannah Brooks", company: "Meridian Health", email: "hbrooks@meridian.example", assignee: "maria", source: "referral", value_dollars: 86_000, stage: Stage::Proposal, priority: Priority::Urgent, idle_days: 2, tags: &["enterprise", "healthcare"] },
    DemoLead { name: "Wei Zhang", company: "Lotus Robotics", email: "wei@lotusrobotics.example", assignee: "dev", source: "event", value_dollars: 54_000, stage: Stage::Proposal, priority: Priority::High, idle_days: 5, tags: &["enterprise"] },
    DemoLead { name: "Olivia Grant", company: "Grant Architecture", email: "olivia@grantarch.example", assignee: "sam", source: "linkedin", value_dollars: 15_000, stage: Stage::Negotiation, priority: Priority::High, idle_days: 4, tags: &[] },
    DemoLead { name: "Diego Moreno", company: "Vega Foods", email: "diego@vegafoods.example", assignee: "maria", source: "referral", value_dollars: 31_000, stage: Stage::Negotiation, priority: Priority::Urgent, idle_days: 1, tags: &["retail"] },
    DemoLead { name: "Aisha Bello", company: "Harbor Credit Union", email: "abello@harborcu.example", assignee: "dev", source: "website", value_dollars: 22_000, stage: Stage::Won, priority: Priority::Medium, idle_days: 20, tags: &["finance"] },
    DemoLead { name: "Ryan Kowalski", company: "Polar Freight", email: "ryan@polarfreight.example", assignee: "sam", source: "cold-call", value_dollars: 6_400, stage: Stage::Won, priority: Priority::Low, idle_days: 35, tags: &[] },
    DemoLead { name: "Emily Novak", company: "Brightline Studios", email: "emily@brightline.example", assignee: "maria", source: "event", value_dollars: 18_000, stage: Stage::Lost, priority: Priority::Medium, idle_days: 28, tags: &[] },
];

/// Demo leads, stamped relative to `now`
pub fn demo_leads(now: i64) -> Vec<Lead> {
    DEMO_LEADS
        .iter()
        .map(|demo| {
            let mut lead = Lead::new(demo.name.to_string());
            lead.company = Some(demo.company.to_string());
            lead.email = Some(demo.email.to_string());
            lead.assignee = Some(demo.assignee.to_string());
            lead.source = Some(demo.source.to_string());
            lead.value_cents = demo.value_dollars * 100;
            lead.stage = demo.stage;
            lead.priority = demo.priority;
            lead.tags = demo.tags.iter().map(|t| t.to_string()).collect();
            lead.last_activity_ts = now - demo.idle_days * 86400;
            lead.created_ts = lead.last_activity_ts - 7 * 86400;
            lead
        })
        .collect()
}

/// Insert the demo leads; returns how many were added
pub fn seed(conn: &Connection, now: i64) -> Result<usize> {
    let leads = demo_leads(now);
    for lead in &leads {
        LeadRepo::create(conn, lead).with_context(|| format!("Failed to seed lead {}", lead.name))?;
    }
    log::debug!("seeded {} demo leads", leads.len());
    Ok(leads.len())
}
