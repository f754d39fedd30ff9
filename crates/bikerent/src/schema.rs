//! Entity descriptors for the bike-rental schema.

use crate::entity;

entity! {
    /// Registered platform users (owners, attendants, customers, managers).
    pub struct Users => "Users", primary_key = UserId;
    pub enum UserColumn {
        UserId = "user_id": Integer,
        Name = "name": Text,
        Email = "email": Text,
        Password = "password": Text,
        Cpf = "cpf": Text,
        Phone = "phone": Text,
        AddressId = "address_id": Integer,
    }
}

entity! {
    /// Role a user holds at a bike rack (owner, attendant, customer or manager).
    pub struct UsersRole => "UsersRole", composite_key = (UserId, BikeRackId);
    pub enum UsersRoleColumn {
        UserId = "user_id": Integer,
        BikeRackId = "bike_rack_id": Integer,
        Role = "role": Text,
    }
}

entity! {
    /// Customers attached to a bike rack.
    pub struct Client => "Client", primary_key = ClientId;
    pub enum ClientColumn {
        ClientId = "client_id": Integer,
        Name = "name": Text,
        Email = "email": Text,
        Cpf = "cpf": Text,
        Phone = "phone": Text,
        AddressId = "address_id": Integer,
        BikeRackId = "bike_rack_id": Integer,
    }
}

entity! {
    /// Staff working at a bike rack.
    pub struct Employee => "Employee", primary_key = EmployeeId;
    pub enum EmployeeColumn {
        EmployeeId = "employee_id": Integer,
        Name = "name": Text,
        Email = "email": Text,
        Phone = "phone": Text,
        Login = "login": Text,
        Password = "password": Text,
        Role = "role": Text,
        BikeRackId = "bike_rack_id": Integer,
    }
}

entity! {
    pub struct BikeRack => "BikeRack", primary_key = BikeRackId;
    pub enum BikeRackColumn {
        BikeRackId = "bike_rack_id": Integer,
        Name = "name": Text,
        Image = "image": Text,
        AddressId = "address_id": Integer,
    }
}

entity! {
    /// A bike rental order.
    pub struct Rent => "Rent", primary_key = RentId;
    pub enum RentColumn {
        RentId = "rent_id": Integer,
        RentDate = "rent_date": Date,
        InitTime = "init_time": Timestamp,
        EndTime = "end_time": Timestamp,
        TotalValue = "total_value": Decimal,
        Status = "status": Text,
        BikeId = "bike_id": Integer,
        ClientId = "client_id": Integer,
        EmployeeId = "employee_id": Integer,
        BikeRackId = "bike_rack_id": Integer,
    }
}

entity! {
    pub struct Bike => "Bike", primary_key = BikeId;
    pub enum BikeColumn {
        BikeId = "bike_id": Integer,
        Model = "model": Text,
        Year = "year": Integer,
        Image = "image": Text,
        BikeRackId = "bike_rack_id": Integer,
    }
}

entity! {
    /// Subscription plans offered by a bike rack.
    pub struct Plan => "Plan", primary_key = PlanId;
    pub enum PlanColumn {
        PlanId = "plan_id": Integer,
        Name = "name": Text,
        Description = "description": Text,
        Price = "price": Decimal,
        Active = "active": Boolean,
        BikeRackId = "bike_rack_id": Integer,
    }
}

entity! {
    pub struct Review => "reviews", primary_key = Id;
    pub enum ReviewColumn {
        Id = "id": Integer,
        Rating = "rating": Integer,
        Comment = "comment": Text,
        UserId = "user_id": Integer,
        BikeRackId = "bike_rack_id": Integer,
        CreatedAt = "created_at": Timestamp,
    }
}

entity! {
    pub struct Notification => "Notification", primary_key = NotificationId;
    pub enum NotificationColumn {
        NotificationId = "notification_id": Integer,
        Title = "title": Text,
        Message = "message": Text,
        Read = "read": Boolean,
        CreatedAt = "created_at": Timestamp,
        RecipientId = "recipient_id": Integer,
        SenderId = "sender_id": Integer,
    }
}

entity! {
    pub struct Address => "Address", primary_key = AddressId;
    pub enum AddressColumn {
        AddressId = "address_id": Integer,
        Street = "street": Text,
        Num = "num": Integer,
        ZipCode = "zip_code": Text,
        City = "city": Text,
        State = "state": Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, ColumnKind, Entity, KeyedEntity, is_plain_ident};

    fn assert_plain<E: Entity>() {
        assert!(is_plain_ident(&E::TABLE.to_ascii_lowercase()), "{}", E::TABLE);
        for c in <E::Column as Column>::ALL {
            assert!(is_plain_ident(c.name()), "{}.{}", E::TABLE, c.name());
        }
        assert!(!E::KEY.is_empty());
        for k in E::KEY {
            assert!(<E::Column as Column>::ALL.contains(k), "{}: key {}", E::TABLE, k.name());
        }
    }

    #[test]
    fn every_declared_identifier_is_plain() {
        assert_plain::<Users>();
        assert_plain::<UsersRole>();
        assert_plain::<Client>();
        assert_plain::<Employee>();
        assert_plain::<BikeRack>();
        assert_plain::<Rent>();
        assert_plain::<Bike>();
        assert_plain::<Plan>();
        assert_plain::<Review>();
        assert_plain::<Notification>();
        assert_plain::<Address>();
    }

    #[test]
    fn from_name_is_exact() {
        assert_eq!(UserColumn::from_name("email"), Some(UserColumn::Email));
        assert_eq!(UserColumn::from_name("EMAIL"), None);
        assert_eq!(UserColumn::from_name("email "), None);
        assert_eq!(UserColumn::from_name("1=1; --"), None);
    }

    #[test]
    fn kinds_follow_declaration() {
        assert_eq!(RentColumn::TotalValue.kind(), ColumnKind::Decimal);
        assert_eq!(RentColumn::RentDate.kind(), ColumnKind::Date);
        assert_eq!(PlanColumn::Active.kind(), ColumnKind::Boolean);
    }

    #[test]
    fn primary_keys() {
        assert_eq!(Users::PRIMARY_KEY.name(), "user_id");
        assert_eq!(BikeRack::PRIMARY_KEY.name(), "bike_rack_id");
        assert_eq!(Review::PRIMARY_KEY.name(), "id");
        assert_eq!(Review::TABLE, "reviews");
        assert_eq!(Users::KEY, &[UserColumn::UserId]);
    }

    #[test]
    fn users_role_has_composite_key() {
        assert_eq!(
            UsersRole::KEY,
            &[UsersRoleColumn::UserId, UsersRoleColumn::BikeRackId]
        );
        assert_eq!(UsersRoleColumn::from_name("role"), Some(UsersRoleColumn::Role));
    }

    #[test]
    fn display_uses_sql_name() {
        assert_eq!(ClientColumn::BikeRackId.to_string(), "bike_rack_id");
    }
}
