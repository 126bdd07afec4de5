#[cfg(test)]
mod verify {
    use std::cell::Cell;

    use fwrite::error::WriteError;
    use fwrite::format::Format;
    use fwrite::value::{Array, Complex, Value, Writable};
    use fwrite::writing::{IoFlags, Session, Sink};

    /// Counts how many times the session asked it to write itself.
    struct Probe<'c> {
        value: Value,
        visits: &'c Cell<usize>,
    }

    impl Writable for Probe<'_> {
        fn write_to(&self, session: &mut Session<'_>) {
            self.visits
                .set(self.visits.get() + 1);
            self.value
                .write_to(session);
        }
    }

    #[test]
    fn arrays_written_column_major() {
        let array = Array::from_fn(&[2, 3], |index| (10 * index[0] + index[1]) as i64);

        let mut text = String::new();
        {
            let mut session = Session::compile(&mut text, "(6I3)").unwrap();
            session.write(&array);
        }
        assert_eq!(text, "  0 10  1 11  2 12");
    }

    #[test]
    fn array_rows_wrap_with_format() {
        let array = Array::new(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();

        let mut text = String::new();
        {
            let mut session = Session::compile(&mut text, "(2I2)").unwrap();
            session.write(&array);
            assert_eq!(session.reverts(), 2);
        }
        assert_eq!(text, " 1 2\n 3 4\n 5 6");
    }

    #[test]
    fn container_stops_at_first_failure() {
        let visits = Cell::new(0);
        let mut buffer: Vec<u8> = Vec::new();
        let mut flags = IoFlags::new();

        // the fourth element in storage order is text
        let array = Array::from_fn(&[2, 3], |index| Probe {
            value: if index[0] == 1 && index[1] == 1 {
                Value::Text("x".to_string())
            } else {
                Value::Integer((1 + index[0] + 2 * index[1]) as i64)
            },
            visits: &visits,
        });

        {
            let mut session = Session::compile(Sink::stream(&mut buffer), "(6I2)")
                .unwrap()
                .with_flags(&mut flags);
            session.write(&array);
        }

        assert_eq!(visits.get(), 4);
        assert_eq!(String::from_utf8(buffer).unwrap(), " 1 2 3");
        assert!(flags.err());
        assert!(matches!(flags.error(), Some(WriteError::Unsupported { .. })));
    }

    #[test]
    fn nested_values() {
        let inner = Array::new(&[2], vec![Value::Integer(1), Value::Real(2.5)]).unwrap();
        let values = vec![
            Value::Text("n".to_string()),
            Value::Array(inner),
            Value::Logical(false),
        ];

        let mut text = String::new();
        {
            let mut session = Session::new(&mut text, Format::list_directed());
            session.write(&values);
        }
        assert_eq!(text, "n 1 2.5 F");
    }

    #[test]
    fn complex_list_directed() {
        let mut text = String::new();
        {
            let mut session = Session::new(&mut text, Format::list_directed());
            session.write(&Complex::new(3.0, -2.0));
        }
        assert_eq!(text, "(3.0,-2.0)");

        let mut text = String::new();
        {
            let mut session = Session::new(&mut text, Format::list_directed());
            session
                .write(&1)
                .write(&Complex::new(3.0, -2.0))
                .write(&Complex::new(0.1f32, 1.5f32))
                .write(&5);
        }
        assert_eq!(text, "1 (3.0,-2.0) (0.1,1.5) 5");
    }

    #[test]
    fn complex_with_explicit_descriptors() {
        let mut text = String::new();
        {
            let mut session = Session::compile(&mut text, "(F5.1, F5.1)").unwrap();
            session.write(&Complex::new(3.0, -2.0));
        }
        assert_eq!(text, "  3.0 -2.0");
    }

    #[test]
    fn complex_part_failure() {
        let mut text = String::new();
        let mut session = Session::compile(&mut text, "(F5.1, I3)").unwrap();
        session.write(&Complex::new(3.0, -2.0));

        assert_eq!(
            session.finish(),
            Err(WriteError::Unsupported {
                descriptor: "I3".to_string(),
                value: "real",
            })
        );
        assert_eq!(text, "  3.0");
    }
}
