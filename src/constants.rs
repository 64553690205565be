pub const API_NAME: &str = "[SMARTWHEELZ-API]";
