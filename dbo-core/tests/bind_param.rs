#[cfg(test)]
mod tests {
    use dbo_core::{AsBindParam, BindParam};
    use std::borrow::Cow;
    use time::{
        Duration,
        macros::{date, datetime},
    };

    #[test]
    fn conversions() {
        assert_eq!(7i16.as_bind_param(), BindParam::Short(7));
        assert_eq!(7i32.as_bind_param(), BindParam::Int32(7));
        assert_eq!(7i64.as_bind_param(), BindParam::Int64(7));
        assert_eq!(1.5f32.as_bind_param(), BindParam::Double(1.5));
        assert_eq!(1.5f64.as_bind_param(), BindParam::Double(1.5));
        assert_eq!(true.as_bind_param(), BindParam::Short(1));
        assert_eq!(false.as_bind_param(), BindParam::Short(0));
        assert_eq!("a".as_bind_param(), BindParam::Text("a".into()));
        assert_eq!(String::from("b").as_bind_param(), BindParam::Text("b".into()));
        assert_eq!(
            Cow::Borrowed("c").as_bind_param(),
            BindParam::Text("c".into())
        );
        assert_eq!(
            vec![1u8, 2].as_bind_param(),
            BindParam::Blob(Box::new([1, 2]))
        );
        assert_eq!(
            [3u8, 4].as_slice().as_bind_param(),
            BindParam::Blob(Box::new([3, 4]))
        );
        assert_eq!(
            datetime!(2020-01-02 03:04:05).as_bind_param(),
            BindParam::Timestamp(datetime!(2020-01-02 03:04:05))
        );
        assert_eq!(
            date!(2020 - 01 - 02).as_bind_param(),
            BindParam::Date(date!(2020 - 01 - 02))
        );
        assert_eq!(
            Duration::milliseconds(1500).as_bind_param(),
            BindParam::Duration(Duration::milliseconds(1500))
        );
        assert_eq!(None::<i32>.as_bind_param(), BindParam::Null);
        assert_eq!(Some(3i64).as_bind_param(), BindParam::Int64(3));
        assert_eq!(BindParam::from("d"), BindParam::Text("d".into()));
        assert_eq!(BindParam::from(None::<String>), BindParam::Null);
    }

    #[test]
    fn text_is_owned() {
        let param = {
            let temporary = String::from("short lived");
            temporary.as_str().as_bind_param()
        };
        assert_eq!(param, BindParam::Text("short lived".into()));
    }

    #[test]
    fn display() {
        assert!(BindParam::default().is_null());
        assert_eq!(BindParam::Null.to_string(), "NULL");
        assert_eq!(BindParam::Text("x".into()).to_string(), "'x'");
        assert_eq!(BindParam::Blob(Box::new([0; 3])).to_string(), "<blob 3 bytes>");
        assert_eq!(
            BindParam::Duration(Duration::seconds(2)).to_string(),
            "2000ms"
        );
        assert_eq!(BindParam::Int64(1).kind(), "Int64");
    }
}
