pub mod booking;
pub mod car;
pub mod user;

pub use booking::{
    Booking, BookingStatus, BookingWithCar, ChangeStatusRequest, CheckAvailabilityRequest,
    CreateBookingRequest, DashboardData, OwnerBooking,
};
pub use car::{Car, CarIdRequest, CarPayload};
pub use user::{LoginRequest, RegisterRequest, User, UserRole};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    #[test]
    fn car_serializes_with_original_wire_names() {
        let now = Utc::now();
        let car = Car {
            id: Uuid::new_v4(),
            owner_id: Some(Uuid::new_v4()),
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            image: "https://img.example/car.webp".to_string(),
            year: 2022,
            category: "Sedan".to_string(),
            seating_capacity: 5,
            fuel_type: "Petrol".to_string(),
            transmission: "Automatic".to_string(),
            price_per_day: 100,
            location: "Mumbai".to_string(),
            description: "Reliable".to_string(),
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&car).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("pricePerDay"));
        assert!(object.contains_key("isAvailable"));
        assert!(object.contains_key("seating_capacity"));
        assert!(object.contains_key("fuel_type"));
        assert!(object.contains_key("owner"));
        assert!(!object.contains_key("price_per_day"));
    }

    #[test]
    fn booking_serializes_status_lowercase_and_dates_plain() {
        let booking = Booking {
            id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            pickup_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            price: 200,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["pickupDate"], "2024-03-01");
        assert_eq!(value["returnDate"], "2024-03-03");
        assert_eq!(value["price"], 200);
    }

    #[test]
    fn user_serialization_never_exposes_the_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: UserRole::Owner,
            image: String::new(),
            created_at: now,
            updated_at: now,
        };

        let text = serde_json::to_string(&user).unwrap();
        assert!(!text.contains("secret-hash"));
        assert!(!text.contains("password"));
        assert!(text.contains("\"role\":\"owner\""));
    }

    #[test]
    fn booking_request_accepts_original_field_names() {
        let request: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "car": "550e8400-e29b-41d4-a716-446655440000",
            "pickupDate": "2024-03-01",
            "returnDate": "2024-03-03"
        }))
        .unwrap();
        assert_eq!(
            request.pickup_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }
}
