//! Dimension catalog - the groupings a caller may request

use crate::plan::{Expr, TimeUnit};
use super::relation::{Relation, ORDERS};
use super::Registry;

/// A registered dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Store,
    StoreId,
    Channel,
    Product,
    ProductCategory,
    CustomerCity,
    OrderStatus,
    Hour,
    DayOfWeek,
    Day,
    Week,
    Month,
    Quarter,
}

impl Dimension {
    pub const ALL: [Dimension; 13] = [
        Dimension::Store,
        Dimension::StoreId,
        Dimension::Channel,
        Dimension::Product,
        Dimension::ProductCategory,
        Dimension::CustomerCity,
        Dimension::OrderStatus,
        Dimension::Hour,
        Dimension::DayOfWeek,
        Dimension::Day,
        Dimension::Week,
        Dimension::Month,
        Dimension::Quarter,
    ];

    /// The time unit for derived time-bucket dimensions
    pub fn time_unit(&self) -> Option<TimeUnit> {
        match self {
            Dimension::Hour => Some(TimeUnit::HourOfDay),
            Dimension::DayOfWeek => Some(TimeUnit::DayOfWeek),
            Dimension::Day => Some(TimeUnit::Day),
            Dimension::Week => Some(TimeUnit::Week),
            Dimension::Month => Some(TimeUnit::Month),
            Dimension::Quarter => Some(TimeUnit::Quarter),
            _ => None,
        }
    }
}

impl Registry for Dimension {
    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn name(&self) -> &'static str {
        match self {
            Dimension::Store => "store",
            Dimension::StoreId => "store_id",
            Dimension::Channel => "channel",
            Dimension::Product => "product",
            Dimension::ProductCategory => "product_category",
            Dimension::CustomerCity => "customer_city",
            Dimension::OrderStatus => "order_status",
            Dimension::Hour => "hour",
            Dimension::DayOfWeek => "day_of_week",
            Dimension::Day => "day",
            Dimension::Week => "week",
            Dimension::Month => "month",
            Dimension::Quarter => "quarter",
        }
    }

    fn expression(&self) -> Expr {
        let bucket = |unit| Expr::time_bucket(unit, Expr::column(ORDERS, "order_date"));
        match self {
            Dimension::Store => Expr::column(Relation::Stores.alias(), "name"),
            Dimension::StoreId => Expr::column(ORDERS, "store_id"),
            Dimension::Channel => Expr::column(ORDERS, "channel"),
            Dimension::Product => Expr::column(Relation::Products.alias(), "name"),
            Dimension::ProductCategory => Expr::column(Relation::Products.alias(), "category"),
            Dimension::CustomerCity => Expr::column(Relation::Customers.alias(), "city"),
            Dimension::OrderStatus => Expr::column(ORDERS, "status"),
            Dimension::Hour => bucket(TimeUnit::HourOfDay),
            Dimension::DayOfWeek => bucket(TimeUnit::DayOfWeek),
            Dimension::Day => bucket(TimeUnit::Day),
            Dimension::Week => bucket(TimeUnit::Week),
            Dimension::Month => bucket(TimeUnit::Month),
            Dimension::Quarter => bucket(TimeUnit::Quarter),
        }
    }

    fn relations(&self) -> &'static [Relation] {
        match self {
            Dimension::Store => &[Relation::Stores],
            Dimension::Product | Dimension::ProductCategory => &[Relation::Products],
            Dimension::CustomerCity => &[Relation::Customers],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Metric;

    #[test]
    fn test_lookup_round_trips_names() {
        for dim in Dimension::ALL {
            assert_eq!(Dimension::lookup(dim.name()), Some(dim));
        }
        assert_eq!(Dimension::lookup("bar"), None);
    }

    #[test]
    fn test_order_status_expression() {
        assert_eq!(Dimension::OrderStatus.expression(), Expr::column("o", "status"));
    }

    #[test]
    fn test_time_buckets_read_order_date() {
        for dim in Dimension::ALL {
            match (dim.time_unit(), dim.expression()) {
                (Some(unit), Expr::TimeBucket { unit: u, expr }) => {
                    assert_eq!(unit, u);
                    assert_eq!(*expr, Expr::column("o", "order_date"));
                }
                (None, Expr::Column(_)) => {}
                (unit, expr) => panic!("{}: unexpected {:?} / {:?}", dim.name(), unit, expr),
            }
        }
    }

    #[test]
    fn test_dimension_and_metric_names_are_disjoint() {
        for dim in Dimension::names() {
            assert!(Metric::lookup(dim).is_none(), "{} is registered twice", dim);
        }
    }
}
