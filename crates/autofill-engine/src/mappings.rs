//! Static field mapping table.
//!
//! Each category lists field types and the label variants a form may use for
//! them. Variants are lowercase and keep their accents; they may overlap
//! across field types, in which case the dictionary keeps the value of the
//! last declaration.

use serde::Serialize;

/// Variants of one field type.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub field_type: &'static str,
    pub variants: &'static [&'static str],
}

/// Field types of one profile category, in declaration order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CategoryMapping {
    pub category: &'static str,
    pub fields: &'static [FieldMapping],
}

/// The complete table as exposed to callers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldMappings {
    pub categories: &'static [CategoryMapping],
    pub signature: &'static [&'static str],
}

/// The mapping table.
pub fn field_mappings() -> FieldMappings {
    FieldMappings {
        categories: FIELD_MAPPINGS,
        signature: SIGNATURE_VARIANTS,
    }
}

/// Every variant maps to `personal.fullName`.
pub const SIGNATURE_VARIANTS: &[&str] = &[
    "signature",
    "signature du candidat",
    "signature électronique",
    "signez ici",
    "veuillez signer",
    "lu et approuvé",
];

/// Full-name variants registered next to the exam codes.
pub const EXAM_TYPE_FULL_VARIANTS: &[&str] = &[
    "sujet d'examen complet",
    "épreuves choisies",
    "épreuves complètes",
];

/// Exam short codes and their full names.
pub const EXAM_CODES: &[(&str, &str)] = &[
    ("CE", "Compréhension écrite"),
    ("CO", "Compréhension orale"),
    ("EE", "Expression écrite"),
    ("EO", "Expression orale"),
];

/// Full name for an exam code, case-insensitive.
pub fn exam_full_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    EXAM_CODES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, full)| *full)
}

const fn field(field_type: &'static str, variants: &'static [&'static str]) -> FieldMapping {
    FieldMapping {
        field_type,
        variants,
    }
}

pub const FIELD_MAPPINGS: &[CategoryMapping] = &[
    CategoryMapping {
        category: "personal",
        fields: &[
            field(
                "lastName",
                &["nom", "nom de famille", "nom de naissance", "last name", "surname", "family name"],
            ),
            field("firstName", &["prénom", "prenom", "prénoms", "first name", "given name"]),
            field(
                "fullName",
                &["nom complet", "nom et prénom", "prénom et nom", "nom et prénoms", "full name"],
            ),
            field("sex", &["sexe", "sex"]),
            field("gender", &["genre", "gender"]),
            field(
                "nationality",
                &["nationalité", "nationality", "pays de nationalité", "citoyenneté"],
            ),
            field(
                "birthPlace",
                &["lieu de naissance", "ville de naissance", "place of birth"],
            ),
            field("birthCountry", &["pays de naissance", "country of birth"]),
            field(
                "maritalStatus",
                &["situation familiale", "situation matrimoniale", "état civil", "marital status"],
            ),
        ],
    },
    CategoryMapping {
        category: "contact",
        fields: &[
            field(
                "email",
                &[
                    "email",
                    "e-mail",
                    "adresse email",
                    "adresse e-mail",
                    "adresse électronique",
                    "courriel",
                    "email address",
                ],
            ),
            field(
                "phone",
                &[
                    "téléphone",
                    "telephone",
                    "numéro de téléphone",
                    "numéro de portable",
                    "phone",
                    "phone number",
                    "mobile",
                ],
            ),
            field("whatsapp", &["whatsapp", "numéro whatsapp"]),
        ],
    },
    CategoryMapping {
        category: "location",
        fields: &[
            field(
                "address",
                &["adresse", "adresse postale", "adresse complète", "address", "street address"],
            ),
            field("city", &["ville", "ville de résidence", "city"]),
            field("postalCode", &["code postal", "postal code", "zip code"]),
            field("province", &["province", "région", "state"]),
            field(
                "country",
                &["pays", "pays de résidence", "country", "country of residence"],
            ),
        ],
    },
    CategoryMapping {
        category: "documents",
        fields: &[
            field(
                "documentType",
                &["type de pièce d'identité", "pièce d'identité", "type de document"],
            ),
            field(
                "passportNumber",
                &["numéro de passeport", "n° de passeport", "passport number"],
            ),
            field(
                "idNumber",
                &["numéro de pièce d'identité", "numéro cni", "numéro de la carte d'identité", "id number"],
            ),
        ],
    },
    CategoryMapping {
        category: "family",
        fields: &[
            field("fatherName", &["nom du père", "father's name"]),
            field("motherName", &["nom de la mère", "mother's name"]),
            field("children", &["nombre d'enfants", "number of children"]),
        ],
    },
    CategoryMapping {
        category: "languages",
        fields: &[
            field(
                "nativeLanguage",
                &["langue maternelle", "première langue", "native language", "mother tongue"],
            ),
            field("spokenLanguages", &["langues parlées", "languages spoken"]),
        ],
    },
    CategoryMapping {
        category: "professional",
        fields: &[
            field("profession", &["profession", "occupation", "métier", "emploi actuel"]),
            field("employer", &["employeur", "nom de l'employeur", "employer"]),
            field(
                "education",
                &["niveau d'études", "dernier diplôme obtenu", "niveau de scolarité", "education level"],
            ),
        ],
    },
    CategoryMapping {
        category: "medical",
        fields: &[field(
            "handicap",
            &["handicap", "besoins particuliers", "aménagement particulier", "disability"],
        )],
    },
    CategoryMapping {
        category: "dates",
        fields: &[
            field(
                "birthDate",
                &["date de naissance", "né le", "née le", "date of birth", "birth date"],
            ),
            field(
                "examDate",
                &["date de l'examen", "date d'examen", "date de session", "exam date"],
            ),
            field(
                "passportIssueDate",
                &["date de délivrance", "date d'émission", "issue date"],
            ),
            field(
                "passportExpiryDate",
                &["date d'expiration", "date d'expiration du passeport", "expiry date"],
            ),
        ],
    },
    CategoryMapping {
        category: "misc",
        fields: &[
            field(
                "motif",
                &[
                    "motif",
                    "motif de l'inscription",
                    "raison de l'inscription",
                    "objectif du test",
                    "pourquoi passez-vous ce test",
                ],
            ),
            field(
                "examCenter",
                &["centre d'examen", "centre de passation", "exam center"],
            ),
            field(
                "engagement",
                &[
                    "je certifie l'exactitude des informations",
                    "j'atteste sur l'honneur",
                    "je m'engage",
                    "j'accepte les conditions",
                ],
            ),
        ],
    },
    CategoryMapping {
        category: "choices",
        fields: &[
            field(
                "examTypes",
                &["sujet d'examen", "épreuves", "épreuves souhaitées", "type d'épreuve", "exam subjects"],
            ),
            field("gender", &["civilité", "titre de civilité"]),
            field(
                "idDocument",
                &["type de pièce", "pièce justificative", "document présenté"],
            ),
            field(
                "handicap",
                &["situation de handicap", "êtes-vous en situation de handicap"],
            ),
            field("examLanguage", &["langue de composition", "langue choisie"]),
        ],
    },
];
