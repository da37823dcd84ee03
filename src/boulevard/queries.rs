//! GraphQL documents issued against the Boulevard Admin API.

/// Connection field name for the primary order query.
pub const ORDERS_FIELD: &str = "orders";

pub const ORDERS_QUERY: &str = r#"
query OrderDetails($locationId: ID, $query: QueryString, $first: Int, $after: String) {
  orders(locationId: $locationId, query: $query, first: $first, after: $after) {
    edges {
      node {
        id
        closedAt
        summary {
          currentSubtotal
        }
        lineGroups {
          lines {
            __typename
            id
            quantity
            currentSubtotal
            currentDiscountAmount

            ... on OrderProductLine {
              productId
              name
            }
            ... on OrderServiceLine {
              serviceId
              name
            }
          }
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

pub const LOCATIONS_FIELD: &str = "locations";

pub const LOCATIONS_QUERY: &str = r#"
query Locations($first: Int, $after: String) {
  locations(first: $first, after: $after) {
    edges {
      node {
        id
        name
        address {
          line1
          line2
          city
          state
          zip
          country
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

pub const SERVICES_FIELD: &str = "services";

pub const SERVICES_QUERY: &str = r#"
query GetServices($first: Int, $after: String) {
  services(first: $first, after: $after) {
    edges {
      node {
        id
        name
        defaultPrice
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

pub const PRODUCTS_FIELD: &str = "products";

pub const PRODUCTS_QUERY: &str = r#"
query GetProducts($first: Int, $after: String) {
  products(first: $first, after: $after) {
    edges {
      node {
        id
        name
        sku
        unitPrice
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;
