#[cfg(test)]
mod tests {
    use crate::access::Actor;
    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::portfolios::{
        NewPortfolio, PortfolioRepositoryTrait, PortfolioService, PortfolioServiceTrait,
        PortfolioUpdate,
    };
    use crate::testing::{portfolio, InMemoryStore};
    use crate::Error;
    use std::sync::Arc;

    fn setup() -> (PortfolioService, InMemoryStore, MockDomainEventSink) {
        let store = InMemoryStore::new();
        let sink = MockDomainEventSink::new();
        let service = PortfolioService::new(Arc::new(store.clone()), Arc::new(sink.clone()));
        (service, store, sink)
    }

    fn new_portfolio(name: &str) -> NewPortfolio {
        NewPortfolio {
            name: name.to_string(),
            description: Some("  long term  ".to_string()),
            is_public: true,
            currency: None,
        }
    }

    #[tokio::test]
    async fn test_create_portfolio_defaults_and_event() {
        let (service, store, sink) = setup();
        let actor = Actor::user("alice");

        let created = service
            .create_portfolio(&actor, new_portfolio("  Growth "))
            .await
            .unwrap();

        assert_eq!(created.name, "Growth");
        assert_eq!(created.owner_id, "alice");
        assert_eq!(created.currency, "TRY");
        assert_eq!(created.description.as_deref(), Some("long term"));
        assert!(store.get_by_id(&created.id).unwrap().is_some());
        assert!(matches!(
            sink.events().as_slice(),
            [DomainEvent::PortfolioCreated { is_public: true, .. }]
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_and_long_names() {
        let (service, _, sink) = setup();
        let actor = Actor::user("alice");

        let blank = service.create_portfolio(&actor, new_portfolio("   ")).await;
        assert!(matches!(blank, Err(Error::Validation(_))));

        let long = service
            .create_portfolio(&actor, new_portfolio(&"x".repeat(101)))
            .await;
        assert!(matches!(long, Err(Error::Validation(_))));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_owner_even_for_admin() {
        let (service, store, _) = setup();
        store.add_portfolio(portfolio("p1", "alice", false));

        let update = PortfolioUpdate {
            name: "Renamed".to_string(),
            description: None,
            is_public: true,
        };

        let by_admin = service
            .update_portfolio(&Actor::admin("root"), "p1", update.clone())
            .await;
        assert!(matches!(by_admin, Err(Error::Unauthorized(_))));

        let by_owner = service
            .update_portfolio(&Actor::user("alice"), "p1", update)
            .await
            .unwrap();
        assert_eq!(by_owner.name, "Renamed");
        assert!(by_owner.is_public);
    }

    #[tokio::test]
    async fn test_delete_portfolio() {
        let (service, store, sink) = setup();
        store.add_portfolio(portfolio("p1", "alice", true));

        let denied = service.delete_portfolio(&Actor::user("bob"), "p1").await;
        assert!(matches!(denied, Err(Error::Unauthorized(_))));

        service
            .delete_portfolio(&Actor::user("alice"), "p1")
            .await
            .unwrap();
        assert!(store.get_by_id("p1").unwrap().is_none());
        assert_eq!(sink.events()[0].kind(), "portfolio_deleted");

        let missing = service.delete_portfolio(&Actor::user("alice"), "p1").await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_get_portfolio_visibility() {
        let (service, store, _) = setup();
        store.add_portfolio(portfolio("private", "alice", false));
        store.add_portfolio(portfolio("public", "alice", true));

        assert!(service.get_portfolio(&Actor::user("alice"), "private").is_ok());
        assert!(service.get_portfolio(&Actor::admin("root"), "private").is_ok());
        assert!(service.get_portfolio(&Actor::user("bob"), "public").is_ok());
        assert!(matches!(
            service.get_portfolio(&Actor::user("bob"), "private"),
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(
            service.get_portfolio(&Actor::user("bob"), "missing"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_list_my_portfolios() {
        let (service, store, _) = setup();
        store.add_portfolio(portfolio("p1", "alice", false));
        store.add_portfolio(portfolio("p2", "bob", true));

        let mine = service.list_my_portfolios(&Actor::user("alice")).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "p1");
    }
}
