//! End-to-end tests across schemas, messages, the registry and the serializer.

#[cfg(test)]
mod tests {
    use crate::config::{PbjConfig, SerializerConfig};
    use crate::errors::Result;
    use crate::field::Field;
    use crate::mapping::MappingBuilder;
    use crate::message::{MessageClass, MessageType};
    use crate::mixins::{Event, EventMixin, HasMicrotime};
    use crate::registry::MessageResolver;
    use crate::schema::Schema;
    use crate::schema_id::SchemaId;
    use crate::serializer::JsonSerializer;
    use crate::testing::{assert_error_code, assert_set_strings, EmailMessage, NestedMessage};
    use crate::types::TypeName;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Recipe;

    impl MessageType for Recipe {
        fn define_schema() -> Result<Schema> {
            Schema::create("Recipe", "pbj:acme:kitchen:node:recipe:1-0-0", vec![
                Field::builder("title", TypeName::String).required().build()?,
                Field::builder("ingredients", TypeName::String).as_a_set().build()?,
            ])
        }
    }

    struct OrderPlaced;

    impl MessageType for OrderPlaced {
        fn define_schema() -> Result<Schema> {
            Schema::create_with_mixins(
                "OrderPlaced",
                "pbj:acme:shop:event:order-placed:1-0-0",
                &[&EventMixin],
                vec![Field::builder("total", TypeName::Int).build()?],
            )
        }
    }

    struct UserRegistered;

    impl MessageType for UserRegistered {
        fn define_schema() -> Result<Schema> {
            Schema::create_with_mixins(
                "UserRegistered",
                "pbj:acme:accounts:event:user-registered:1-0-0",
                &[&EventMixin],
                vec![Field::builder("email", TypeName::String).build()?],
            )
        }
    }

    #[test]
    fn test_recipe_lifecycle() {
        let mut recipe = Recipe::from_plain(&json!({"title": "Fried chicken"})).unwrap();
        assert!(recipe.get_set("ingredients").unwrap().is_empty());

        recipe
            .add_values_to_set("ingredients", ["Chicken", "chicken", "CHICKEN"])
            .unwrap();
        assert_set_strings(&recipe, "ingredients", &["Chicken"]);

        assert_error_code(&recipe.clear("title"), "RequiredFieldMissing");
        assert!(recipe.has("title").unwrap());

        recipe.freeze();
        assert_error_code(
            &recipe.add_values_to_set("ingredients", ["salt"]),
            "FrozenMessageIsImmutable",
        );

        let mut copy = recipe.clone();
        copy.add_values_to_set("ingredients", ["salt"]).unwrap();
        assert_set_strings(&copy, "ingredients", &["Chicken", "salt"]);
        assert_set_strings(&recipe, "ingredients", &["Chicken"]);
        assert!(recipe.is_frozen());
    }

    #[test]
    fn test_recipe_without_title_fails() {
        assert_error_code(&Recipe::create(), "RequiredFieldMissing");
    }

    fn resolver() -> MessageResolver {
        let resolver = MessageResolver::new();
        resolver
            .register_map([
                ("acme:shop:event:order-placed:v1", OrderPlaced::class()),
                ("acme:accounts:event:user-registered:v1", UserRegistered::class()),
                ("acme:kitchen:node:recipe", Recipe::class()),
            ])
            .unwrap();
        resolver.seal();
        resolver
    }

    #[test]
    fn test_registry_resolution() {
        let resolver = resolver();

        let id = SchemaId::parse("pbj:acme:shop:event:order-placed:1-3-0").unwrap();
        assert!(resolver.resolve_by_schema_id(&id).unwrap().is::<OrderPlaced>());

        let recipe = SchemaId::parse("pbj:acme:kitchen:node:recipe:2-0-0").unwrap();
        assert!(resolver.resolve_by_schema_id(&recipe).unwrap().is::<Recipe>());

        let unknown = SchemaId::parse("pbj:acme:shop:event:order-cancelled:1-0-0").unwrap();
        assert_error_code(&resolver.resolve_by_schema_id(&unknown), "NoMessageForSchemaId");

        assert_error_code(&resolver.register_schema::<EmailMessage>(), "RegistrySealed");
    }

    #[test]
    fn test_mixin_queries() {
        let resolver = resolver();

        let all = resolver.find_all_using_mixin(EventMixin::CURIE, None, None).unwrap();
        assert_eq!(all, vec![UserRegistered::class(), OrderPlaced::class()]);

        let shop = resolver
            .find_one_using_mixin(EventMixin::CURIE, Some("shop"), None)
            .unwrap();
        assert_eq!(shop, MessageClass::of::<OrderPlaced>());

        assert_error_code(
            &resolver.find_one_using_mixin(EventMixin::CURIE, None, None),
            "MoreThanOneMessageForMixin",
        );
        assert_error_code(
            &resolver.find_all_using_mixin(EventMixin::CURIE, Some("kitchen"), None),
            "NoMessageForMixin",
        );
    }

    #[test]
    fn test_event_round_trip_through_json() {
        let resolver = resolver();
        let config = PbjConfig::new().with_serializer(SerializerConfig::new().with_pretty(true));
        let serializer = JsonSerializer::new(config.serializer);

        let mut order = OrderPlaced::create().unwrap();
        order.set_single_value("total", 42).unwrap();
        let event_id = order.event_id().unwrap();
        let microtime = order.microtime().unwrap();

        let text = serializer.serialize(&order).unwrap();
        let back = serializer.deserialize(&text, &resolver).unwrap();

        assert!(back.schema().has_mixin(EventMixin::CURIE));
        assert_eq!(back.event_id().unwrap(), event_id);
        assert_eq!(back.microtime().unwrap(), microtime);
        assert_eq!(back.get_single("total").unwrap().as_deref(), Some(&Value::Int(42)));
        assert_eq!(back, order);
    }

    #[test]
    fn test_mapping_for_fixture() {
        let schema = EmailMessage::schema().unwrap();
        let mapping = MappingBuilder::new().build(&schema).unwrap();
        let props = &mapping["properties"];

        assert_eq!(props["from_email"], json!({"type": "string", "index": "not_analyzed"}));
        assert_eq!(props["priority"], json!({"type": "integer"}));
        assert_eq!(props["a_big_int"], json!({"type": "long"}));
        assert_eq!(props["any_of_message"], json!({"type": "nested"}));

        let nested = NestedMessage::schema().unwrap();
        assert_eq!(
            props["nested"]["properties"],
            MappingBuilder::new().build(&nested).unwrap()["properties"]
        );
    }
}
