//! Tests for catalog module

use super::*;
use crate::error::Error;
use crate::test_support::full_catalog;

#[test]
fn test_pricing_unit_cost() {
    let text = Pricing::Tokens {
        input_per_1m: 1.0,
        output_per_1m: 3.0,
    };
    assert_eq!(text.modality(), Modality::Text);
    assert!((text.unit_cost() - 0.002).abs() < 1e-12);

    let image = Pricing::Image { per_image: 0.04 };
    assert_eq!(image.modality(), Modality::Image);
    assert!((image.unit_cost() - 0.04).abs() < 1e-12);
}

#[test]
fn test_descriptor_cost_for_units() {
    let text = ProviderDescriptor::new(
        "t",
        3,
        Pricing::Tokens {
            input_per_1m: 1.0,
            output_per_1m: 3.0,
        },
        true,
    );
    // 2K tokens at $0.002 per 1K
    assert!((text.cost_for(2_000) - 0.004).abs() < 1e-12);
    assert_eq!(text.input_cost_per_1m(), Some(1.0));
    assert_eq!(text.output_cost_per_1m(), Some(3.0));

    let image = ProviderDescriptor::new("i", 3, Pricing::Image { per_image: 0.05 }, true);
    assert!((image.cost_for(3) - 0.15).abs() < 1e-12);
    assert_eq!(image.input_cost_per_1m(), None);
}

#[test]
fn test_default_catalog_is_valid() {
    let catalog = full_catalog();
    assert_eq!(catalog.providers().len(), default_catalog_specs().len());
    assert_eq!(catalog.get(names::GROQ).unwrap().modality, Modality::Text);
    assert_eq!(
        catalog.get(names::FLUX_SCHNELL).unwrap().modality,
        Modality::Image
    );
}

#[test]
fn test_get_unknown_provider() {
    let catalog = full_catalog();
    assert!(matches!(
        catalog.get("midjourney"),
        Err(Error::UnknownProvider(name)) if name == "midjourney"
    ));
}

#[test]
fn test_available_providers_sorted_by_cost() {
    let catalog = full_catalog();
    let text: Vec<_> = catalog
        .available_providers(Modality::Text)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(
        text,
        vec![
            names::GROQ,
            names::GEMINI,
            names::DEEPSEEK,
            names::OPENAI,
            names::ANTHROPIC
        ]
    );

    let costs: Vec<f64> = catalog
        .available_providers(Modality::Image)
        .iter()
        .map(|p| p.unit_cost)
        .collect();
    assert!(costs.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_available_providers_skips_missing_credentials() {
    let credentials = StaticCredentials::new(["OPENAI_API_KEY", "FAL_KEY"]);
    let catalog = Catalog::from_specs(
        &default_catalog_specs(),
        &credentials,
        &[Modality::Text, Modality::Image],
    )
    .unwrap();

    let text: Vec<_> = catalog
        .available_providers(Modality::Text)
        .iter()
        .map(|p| p.name.clone())
        .collect();
    assert_eq!(text, vec![names::OPENAI.to_string()]);
    assert!(!catalog.is_available(names::GROQ));
    assert!(catalog.is_available(names::DALL_E_3));
}

#[test]
fn test_cheapest_available_with_exclude() {
    let catalog = full_catalog();
    assert_eq!(
        catalog.cheapest_available(Modality::Text, &[]).unwrap().name,
        names::GROQ
    );
    assert_eq!(
        catalog
            .cheapest_available(Modality::Text, &[names::GROQ])
            .unwrap()
            .name,
        names::GEMINI
    );

    let all_text: Vec<&str> = catalog
        .available_providers(Modality::Text)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert!(matches!(
        catalog.cheapest_available(Modality::Text, &all_text),
        Err(Error::NoneAvailable(Modality::Text))
    ));
}

#[test]
fn test_next_cheaper_available() {
    let catalog = full_catalog();
    let openai = catalog.get(names::OPENAI).unwrap();
    assert_eq!(
        catalog.next_cheaper_available(openai).unwrap().name,
        names::DEEPSEEK
    );

    let groq = catalog.get(names::GROQ).unwrap();
    assert!(catalog.next_cheaper_available(groq).is_none());
}

#[test]
fn test_next_cheaper_tie_uses_declaration_order() {
    let tokens = Pricing::Tokens {
        input_per_1m: 1.0,
        output_per_1m: 1.0,
    };
    let catalog = Catalog::new(
        vec![
            ProviderDescriptor::new("first", 2, tokens, true),
            ProviderDescriptor::new("second", 3, tokens, true),
            ProviderDescriptor::new(
                "premium",
                5,
                Pricing::Tokens {
                    input_per_1m: 10.0,
                    output_per_1m: 10.0,
                },
                true,
            ),
        ],
        &[Modality::Text],
    )
    .unwrap();

    let premium = catalog.get("premium").unwrap();
    assert_eq!(catalog.next_cheaper_available(premium).unwrap().name, "first");
}

#[test]
fn test_most_expensive_ignores_availability() {
    let credentials = StaticCredentials::new(["GROQ_API_KEY", "FAL_KEY"]);
    let catalog = Catalog::from_specs(
        &default_catalog_specs(),
        &credentials,
        &[Modality::Text],
    )
    .unwrap();
    assert_eq!(
        catalog.most_expensive(Modality::Text).unwrap().name,
        names::ANTHROPIC
    );
    assert_eq!(
        catalog.most_expensive(Modality::Image).unwrap().name,
        names::FLUX_PRO
    );
}

#[test]
fn test_zero_text_providers_is_configuration_error() {
    let credentials = StaticCredentials::new(["FAL_KEY"]);
    let result = Catalog::from_specs(
        &default_catalog_specs(),
        &credentials,
        &[Modality::Text, Modality::Image],
    );
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_optional_modality_may_be_empty() {
    let credentials = StaticCredentials::new(["GROQ_API_KEY"]);
    let catalog =
        Catalog::from_specs(&default_catalog_specs(), &credentials, &[Modality::Text]).unwrap();
    assert!(catalog.available_providers(Modality::Image).is_empty());
}

#[test]
fn test_duplicate_names_rejected() {
    let pricing = Pricing::Image { per_image: 0.01 };
    let result = Catalog::new(
        vec![
            ProviderDescriptor::new("dup", 2, pricing, true),
            ProviderDescriptor::new("dup", 3, pricing, true),
        ],
        &[],
    );
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_invalid_descriptor_rejected() {
    let free = ProviderDescriptor::new("free", 3, Pricing::Image { per_image: 0.0 }, true);
    assert!(Catalog::new(vec![free], &[]).is_err());

    let off_scale = ProviderDescriptor::new("loud", 9, Pricing::Image { per_image: 0.1 }, true);
    assert!(Catalog::new(vec![off_scale], &[]).is_err());

    let zero = ProviderDescriptor::new("zero", 0, Pricing::Image { per_image: 0.1 }, true);
    assert!(Catalog::new(vec![zero], &[]).is_err());
}

#[test]
fn test_env_credentials_ignores_blank() {
    // Variable names are unique to this test
    std::env::set_var("BRANDFORGE_TEST_BLANK_KEY", "  ");
    std::env::set_var("BRANDFORGE_TEST_SET_KEY", "abc123");
    assert!(!EnvCredentials.has_credential("BRANDFORGE_TEST_BLANK_KEY"));
    assert!(EnvCredentials.has_credential("BRANDFORGE_TEST_SET_KEY"));
    assert!(!EnvCredentials.has_credential("BRANDFORGE_TEST_UNSET_KEY"));
}
