use serde::Serialize;

use crate::tax::resolver::TransferMode;

/// Public references cited by nudges and tax figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceId {
    #[serde(rename = "sp_succession_2025")]
    SpSuccession2025,
    #[serde(rename = "sp_donation_2024")]
    SpDonation2024,
    #[serde(rename = "sp_pacs_2026")]
    SpPacs2026,
    #[serde(rename = "legi_cc_912")]
    LegiCc912,
    #[serde(rename = "eurlex_650_2012")]
    EurLex650_2012,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Source {
    pub id: SourceId,
    pub name: &'static str,
    pub verified: &'static str,
    pub url: &'static str,
}

pub const SOURCES: [Source; 5] = [
    Source {
        id: SourceId::SpSuccession2025,
        name: "Service-Public — Droits de succession",
        verified: "Vérifié le 31 juillet 2025",
        url: "https://www.service-public.fr/particuliers/vosdroits/F35794",
    },
    Source {
        id: SourceId::SpDonation2024,
        name: "Service-Public — Droits de donation",
        verified: "Vérifié le 07 novembre 2024",
        url: "https://www.service-public.fr/particuliers/vosdroits/F14203",
    },
    Source {
        id: SourceId::SpPacs2026,
        name: "Service-Public — Effets d'un PACS",
        verified: "Vérifié le 27 janvier 2026",
        url: "https://www.service-public.fr/particuliers/vosdroits/F1026",
    },
    Source {
        id: SourceId::LegiCc912,
        name: "Légifrance — Code civil, art. 912 (réserve/quotité)",
        verified: "Version en vigueur depuis le 01 janvier 2007",
        url: "https://www.legifrance.gouv.fr/codes/article_lc/LEGIARTI000006435530",
    },
    Source {
        id: SourceId::EurLex650_2012,
        name: "EUR-Lex — Règlement (UE) n°650/2012 (successions)",
        verified: "04 July 2012",
        url: "https://eur-lex.europa.eu/eli/reg/2012/650/oj/eng",
    },
];

pub fn source(id: SourceId) -> &'static Source {
    // SOURCES holds exactly one entry per SourceId variant.
    match id {
        SourceId::SpSuccession2025 => &SOURCES[0],
        SourceId::SpDonation2024 => &SOURCES[1],
        SourceId::SpPacs2026 => &SOURCES[2],
        SourceId::LegiCc912 => &SOURCES[3],
        SourceId::EurLex650_2012 => &SOURCES[4],
    }
}

/// Where the brackets and allowances for `mode` come from.
pub fn tax_source(mode: TransferMode) -> SourceId {
    match mode {
        TransferMode::Succession => SourceId::SpSuccession2025,
        TransferMode::Donation => SourceId::SpDonation2024,
    }
}

/// Sources behind the tax figures plus every cited id, in reference-list order.
pub fn sources_used(mode: TransferMode, cited: impl IntoIterator<Item = SourceId>) -> Vec<Source> {
    let mut wanted = vec![tax_source(mode)];
    wanted.extend(cited);
    SOURCES
        .iter()
        .filter(|s| wanted.contains(&s.id))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_id() {
        for s in &SOURCES {
            assert_eq!(source(s.id).id, s.id);
        }
    }

    #[test]
    fn test_sources_used_always_includes_tax_source() {
        let used = sources_used(TransferMode::Donation, []);
        assert_eq!(used.len(), 1);
        assert_eq!(used[0].id, SourceId::SpDonation2024);
    }

    #[test]
    fn test_sources_used_deduplicated_and_ordered() {
        let used = sources_used(
            TransferMode::Succession,
            [
                SourceId::EurLex650_2012,
                SourceId::SpSuccession2025,
                SourceId::EurLex650_2012,
                SourceId::LegiCc912,
            ],
        );
        let ids: Vec<SourceId> = used.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                SourceId::SpSuccession2025,
                SourceId::LegiCc912,
                SourceId::EurLex650_2012
            ]
        );
    }

    #[test]
    fn test_source_id_serializes_as_reference_key() {
        let v = serde_json::to_value(SourceId::EurLex650_2012).unwrap();
        assert_eq!(v, serde_json::json!("eurlex_650_2012"));
    }
}
