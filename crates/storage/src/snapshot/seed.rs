#![forbid(unsafe_code)]

use ct_core::Requirement;

pub(crate) const STARTER_FRAMEWORK: &str = "nist-csf-2.0";

/// Starter catalog installed only when the requirements collection is empty
/// on first open; a re-import of the same framework replaces these rows
/// wholesale and user data is never overwritten by seeding.
pub(crate) fn starter_requirements() -> Vec<Requirement> {
    STARTER_ROWS
        .iter()
        .map(
            |(subcategory_id, function, category, category_id, description, example)| Requirement {
                id: (*subcategory_id).to_string(),
                framework_id: STARTER_FRAMEWORK.to_string(),
                function: (*function).to_string(),
                category: (*category).to_string(),
                category_id: (*category_id).to_string(),
                subcategory_id: (*subcategory_id).to_string(),
                subcategory_description: (*description).to_string(),
                implementation_example: (*example).to_string(),
                in_scope: false,
            },
        )
        .collect()
}

type SeedRow = (
    &'static str, // subcategory id
    &'static str, // function
    &'static str, // category
    &'static str, // category id
    &'static str, // subcategory description
    &'static str, // implementation example
);

const STARTER_ROWS: &[SeedRow] = &[
    (
        "GV.OC-01",
        "Govern",
        "Organizational Context",
        "GV.OC",
        "The organizational mission is understood and informs cybersecurity risk management.",
        "Share the organization's mission to provide a basis for identifying risks that may impede it.",
    ),
    (
        "GV.RM-01",
        "Govern",
        "Risk Management Strategy",
        "GV.RM",
        "Risk management objectives are established and agreed to by organizational stakeholders.",
        "Update near-term and long-term cybersecurity risk management objectives as part of annual strategic planning.",
    ),
    (
        "GV.PO-01",
        "Govern",
        "Policy",
        "GV.PO",
        "Organizational cybersecurity policy is established, communicated, and enforced.",
        "Create, disseminate, and maintain an understandable cybersecurity policy approved by leadership.",
    ),
    (
        "ID.AM-01",
        "Identify",
        "Asset Management",
        "ID.AM",
        "Inventories of hardware managed by the organization are maintained.",
        "Maintain inventories for all types of hardware, including IT, IoT, and OT devices.",
    ),
    (
        "ID.AM-02",
        "Identify",
        "Asset Management",
        "ID.AM",
        "Inventories of software, services, and systems managed by the organization are maintained.",
        "Maintain inventories for all types of software and services, including commercial and open-source.",
    ),
    (
        "ID.RA-01",
        "Identify",
        "Risk Assessment",
        "ID.RA",
        "Vulnerabilities in assets are identified, validated, and recorded.",
        "Use vulnerability management technologies to identify unpatched and misconfigured software.",
    ),
    (
        "PR.AA-01",
        "Protect",
        "Identity Management, Authentication, and Access Control",
        "PR.AA",
        "Identities and credentials for authorized users, services, and hardware are managed by the organization.",
        "Issue, manage, and revoke identities and credentials for authorized entities.",
    ),
    (
        "PR.DS-01",
        "Protect",
        "Data Security",
        "PR.DS",
        "The confidentiality, integrity, and availability of data-at-rest are protected.",
        "Encrypt data-at-rest and restrict access to it based on classification.",
    ),
    (
        "PR.PS-01",
        "Protect",
        "Platform Security",
        "PR.PS",
        "Configuration management practices are established and applied.",
        "Establish, test, deploy, and maintain hardened baselines that enforce least functionality.",
    ),
    (
        "DE.CM-01",
        "Detect",
        "Continuous Monitoring",
        "DE.CM",
        "Networks and network services are monitored to find potentially adverse events.",
        "Monitor network traffic flows for deviations from expected baselines.",
    ),
    (
        "DE.AE-02",
        "Detect",
        "Adverse Event Analysis",
        "DE.AE",
        "Potentially adverse events are analyzed to better understand associated activities.",
        "Use security information and event management systems to correlate and analyze events.",
    ),
    (
        "RS.MA-01",
        "Respond",
        "Incident Management",
        "RS.MA",
        "The incident response plan is executed in coordination with relevant third parties once an incident is declared.",
        "Detect and analyze incidents and execute the response plan with applicable stakeholders.",
    ),
    (
        "RC.RP-01",
        "Recover",
        "Incident Recovery Plan Execution",
        "RC.RP",
        "The recovery portion of the incident response plan is executed once initiated from the incident response process.",
        "Begin recovery actions once the integrity of backups and restoration assets has been verified.",
    ),
];
