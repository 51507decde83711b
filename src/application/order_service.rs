use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderView, PlaceOrder, PricedItem, PricedOrder};
use crate::domain::ports::{CatalogReader, OrderRepository, PrescriptionGate};
use crate::domain::ListResult;

/// Order placement workflow.
///
/// Validation (product existence, variant membership, prescription approval,
/// stock sufficiency) and pricing run against reads taken before the commit;
/// the repository then applies order, items, inventory decrements and the
/// audit entry in one transaction. Any validation failure returns before a
/// single row is written.
pub struct OrderService<C, G, R> {
    catalog: C,
    gate: G,
    repo: R,
}

impl<C, G, R> OrderService<C, G, R>
where
    C: CatalogReader,
    G: PrescriptionGate,
    R: OrderRepository,
{
    pub fn new(catalog: C, gate: G, repo: R) -> Self {
        Self { catalog, gate, repo }
    }

    pub fn place_order(&self, user_id: Uuid, cmd: PlaceOrder) -> Result<OrderView, DomainError> {
        if cmd.items.is_empty() {
            return Err(DomainError::InvalidInput(
                "order must contain at least one item".to_string(),
            ));
        }
        for item in &cmd.items {
            if item.qty <= 0 {
                return Err(DomainError::InvalidInput(format!(
                    "quantity must be a positive integer for product {}",
                    item.product_id
                )));
            }
        }

        // Load all involved products once.
        let mut ids: Vec<Uuid> = cmd.items.iter().map(|i| i.product_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let products = self.catalog.products_for_order(&ids)?;
        let by_id: HashMap<Uuid, _> = products.iter().map(|p| (p.id, p)).collect();

        let mut total_cents: i64 = 0;
        let mut priced = Vec::with_capacity(cmd.items.len());
        for item in &cmd.items {
            let product = by_id.get(&item.product_id).ok_or(DomainError::InvalidProduct {
                product_id: item.product_id,
            })?;

            if let Some(variant_id) = item.variant_id {
                if !product.variant_ids.contains(&variant_id) {
                    return Err(DomainError::InvalidVariant {
                        product_id: product.id,
                        variant_id,
                    });
                }
            }

            if product.prescription_required && !self.gate.is_approved(user_id, product.id)? {
                return Err(DomainError::PrescriptionRequired {
                    product_id: product.id,
                    title: product.title.clone(),
                });
            }

            if product.inventory < item.qty {
                return Err(DomainError::InsufficientStock {
                    product_id: product.id,
                    title: product.title.clone(),
                });
            }

            total_cents += i64::from(product.price_cents) * i64::from(item.qty);
            priced.push(PricedItem {
                product_id: product.id,
                variant_id: item.variant_id,
                qty: item.qty,
                unit_price_cents: product.price_cents,
            });
        }

        self.repo.create(PricedOrder {
            user_id,
            total_cents,
            is_emergency: cmd.is_emergency,
            is_tax_exempt: cmd.is_tax_exempt,
            items: priced,
        })
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_orders(
        &self,
        user_id: Option<Uuid>,
        page: i64,
        limit: i64,
    ) -> Result<ListResult<OrderView>, DomainError> {
        self.repo.list(user_id, page, limit)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use super::*;
    use crate::domain::catalog::ProductSummary;
    use crate::domain::order::{OrderItemInput, OrderItemView, ORDER_STATUS_PENDING};

    struct FakeCatalog {
        products: Vec<ProductSummary>,
    }

    impl CatalogReader for FakeCatalog {
        fn products_for_order(&self, ids: &[Uuid]) -> Result<Vec<ProductSummary>, DomainError> {
            Ok(self
                .products
                .iter()
                .filter(|p| ids.contains(&p.id))
                .cloned()
                .collect())
        }
    }

    struct FakeGate {
        approved: HashSet<(Uuid, Uuid)>,
    }

    impl PrescriptionGate for FakeGate {
        fn is_approved(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, DomainError> {
            Ok(self.approved.contains(&(user_id, product_id)))
        }
    }

    #[derive(Default)]
    struct RecordingOrders {
        created: Arc<Mutex<Vec<PricedOrder>>>,
    }

    impl OrderRepository for RecordingOrders {
        fn create(&self, order: PricedOrder) -> Result<OrderView, DomainError> {
            let view = OrderView {
                id: Uuid::new_v4(),
                user_id: order.user_id,
                status: ORDER_STATUS_PENDING.to_string(),
                total_cents: order.total_cents,
                is_emergency: order.is_emergency,
                is_tax_exempt: order.is_tax_exempt,
                created_at: Utc::now(),
                items: order
                    .items
                    .iter()
                    .map(|i| OrderItemView {
                        id: Uuid::new_v4(),
                        product_id: i.product_id,
                        variant_id: i.variant_id,
                        qty: i.qty,
                        unit_price_cents: i.unit_price_cents,
                    })
                    .collect(),
            };
            self.created.lock().unwrap().push(order);
            Ok(view)
        }

        fn find_by_id(&self, _id: Uuid) -> Result<Option<OrderView>, DomainError> {
            Ok(None)
        }

        fn list(
            &self,
            _user_id: Option<Uuid>,
            _page: i64,
            _limit: i64,
        ) -> Result<ListResult<OrderView>, DomainError> {
            Ok(ListResult { items: vec![], total: 0 })
        }
    }

    fn product(price_cents: i32, inventory: i32, restricted: bool) -> ProductSummary {
        ProductSummary {
            id: Uuid::new_v4(),
            title: "Infusion pump".to_string(),
            price_cents,
            inventory,
            prescription_required: restricted,
            variant_ids: vec![],
        }
    }

    fn service(
        products: Vec<ProductSummary>,
        approved: HashSet<(Uuid, Uuid)>,
    ) -> (
        OrderService<FakeCatalog, FakeGate, RecordingOrders>,
        Arc<Mutex<Vec<PricedOrder>>>,
    ) {
        let repo = RecordingOrders::default();
        let created = repo.created.clone();
        (
            OrderService::new(FakeCatalog { products }, FakeGate { approved }, repo),
            created,
        )
    }

    fn item(product_id: Uuid, qty: i32) -> OrderItemInput {
        OrderItemInput { product_id, variant_id: None, qty }
    }

    fn place(items: Vec<OrderItemInput>) -> PlaceOrder {
        PlaceOrder { items, is_emergency: false, is_tax_exempt: false }
    }

    #[test]
    fn total_is_sum_of_captured_unit_prices_times_qty() {
        let a = product(1000, 10, false);
        let b = product(250, 10, false);
        let (svc, created) = service(vec![a.clone(), b.clone()], HashSet::new());

        let order = svc
            .place_order(Uuid::new_v4(), place(vec![item(a.id, 5), item(b.id, 2)]))
            .expect("order should succeed");

        assert_eq!(order.total_cents, 5 * 1000 + 2 * 250);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].unit_price_cents, 1000);
        assert_eq!(order.items[1].unit_price_cents, 250);
        assert_eq!(created.lock().unwrap().len(), 1);
    }

    #[test]
    fn exact_stock_order_succeeds() {
        let p = product(1000, 5, false);
        let (svc, _) = service(vec![p.clone()], HashSet::new());

        let order = svc
            .place_order(Uuid::new_v4(), place(vec![item(p.id, 5)]))
            .expect("order for the full inventory should succeed");

        assert_eq!(order.total_cents, 5000);
    }

    #[test]
    fn unknown_product_is_rejected_before_commit() {
        let (svc, created) = service(vec![], HashSet::new());
        let missing = Uuid::new_v4();

        let err = svc
            .place_order(Uuid::new_v4(), place(vec![item(missing, 1)]))
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidProduct { product_id } if product_id == missing));
        assert!(created.lock().unwrap().is_empty());
    }

    #[test]
    fn restricted_product_without_approval_is_rejected() {
        let p = product(1000, 5, true);
        let (svc, created) = service(vec![p.clone()], HashSet::new());

        let err = svc
            .place_order(Uuid::new_v4(), place(vec![item(p.id, 1)]))
            .unwrap_err();

        assert!(
            matches!(err, DomainError::PrescriptionRequired { product_id, .. } if product_id == p.id)
        );
        assert!(created.lock().unwrap().is_empty());
    }

    #[test]
    fn restricted_product_with_approval_succeeds() {
        let p = product(1000, 5, true);
        let user = Uuid::new_v4();
        let mut approved = HashSet::new();
        approved.insert((user, p.id));
        let (svc, _) = service(vec![p.clone()], approved);

        svc.place_order(user, place(vec![item(p.id, 1)]))
            .expect("approved prescription should unlock the product");
    }

    #[test]
    fn approval_for_another_user_does_not_count() {
        let p = product(1000, 5, true);
        let other = Uuid::new_v4();
        let mut approved = HashSet::new();
        approved.insert((other, p.id));
        let (svc, _) = service(vec![p.clone()], approved);

        let err = svc
            .place_order(Uuid::new_v4(), place(vec![item(p.id, 1)]))
            .unwrap_err();
        assert!(matches!(err, DomainError::PrescriptionRequired { .. }));
    }

    #[test]
    fn qty_exceeding_inventory_is_rejected() {
        let p = product(1000, 2, false);
        let (svc, created) = service(vec![p.clone()], HashSet::new());

        let err = svc
            .place_order(Uuid::new_v4(), place(vec![item(p.id, 3)]))
            .unwrap_err();

        assert!(
            matches!(err, DomainError::InsufficientStock { product_id, .. } if product_id == p.id)
        );
        assert!(created.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_item_list_is_rejected() {
        let (svc, created) = service(vec![], HashSet::new());

        let err = svc.place_order(Uuid::new_v4(), place(vec![])).unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(created.lock().unwrap().is_empty());
    }

    #[test]
    fn non_positive_qty_is_rejected() {
        let p = product(1000, 5, false);
        let (svc, _) = service(vec![p.clone()], HashSet::new());

        let err = svc
            .place_order(Uuid::new_v4(), place(vec![item(p.id, 0)]))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let p = product(1000, 5, false);
        let (svc, _) = service(vec![p.clone()], HashSet::new());

        let err = svc
            .place_order(
                Uuid::new_v4(),
                place(vec![OrderItemInput {
                    product_id: p.id,
                    variant_id: Some(Uuid::new_v4()),
                    qty: 1,
                }]),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidVariant { .. }));
    }

    #[test]
    fn known_variant_is_accepted_and_does_not_change_pricing() {
        let mut p = product(1000, 5, false);
        let variant_id = Uuid::new_v4();
        p.variant_ids.push(variant_id);
        let (svc, _) = service(vec![p.clone()], HashSet::new());

        let order = svc
            .place_order(
                Uuid::new_v4(),
                place(vec![OrderItemInput {
                    product_id: p.id,
                    variant_id: Some(variant_id),
                    qty: 2,
                }]),
            )
            .expect("variant order should succeed");

        // Unit price is the product's price; the variant delta stays catalog data.
        assert_eq!(order.items[0].unit_price_cents, 1000);
        assert_eq!(order.total_cents, 2000);
        assert_eq!(order.items[0].variant_id, Some(variant_id));
    }

    #[test]
    fn emergency_and_tax_exempt_flags_are_persisted_verbatim() {
        let p = product(1000, 5, false);
        let (svc, created) = service(vec![p.clone()], HashSet::new());

        let order = svc
            .place_order(
                Uuid::new_v4(),
                PlaceOrder {
                    items: vec![item(p.id, 1)],
                    is_emergency: true,
                    is_tax_exempt: true,
                },
            )
            .expect("order should succeed");

        assert!(order.is_emergency);
        assert!(order.is_tax_exempt);
        let stored = created.lock().unwrap();
        assert!(stored[0].is_emergency && stored[0].is_tax_exempt);
    }
}
