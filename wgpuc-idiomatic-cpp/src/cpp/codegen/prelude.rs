//! Hand-written parts of the wrapper that do not depend on the header contents.

use indoc::indoc;

/// Boolean wrappers, the status adapter and the refcounted handle base.
pub const CORE_TYPES: &str = indoc!(r#"
    class Bool {
     public:
      constexpr Bool() = default;
      constexpr Bool(bool value) : mValue(static_cast<WGPUBool>(value)) {}
      Bool(WGPUBool value) : mValue(value) {}

      constexpr operator bool() const { return static_cast<bool>(mValue); }

     private:
      friend struct std::hash<Bool>;
      WGPUBool mValue = static_cast<WGPUBool>(false);
    };

    class OptionalBool {
     public:
      constexpr OptionalBool() = default;
      constexpr OptionalBool(bool value)
          : mValue(static_cast<WGPUOptionalBool>(value)) {}
      constexpr OptionalBool(std::optional<bool> value)
          : mValue(value ? static_cast<WGPUOptionalBool>(*value)
                         : WGPUOptionalBool_Undefined) {}
      constexpr OptionalBool(WGPUOptionalBool value) : mValue(value) {}

      static const OptionalBool False;
      static const OptionalBool True;
      static const OptionalBool Undefined;

      OptionalBool& operator=(const bool& value) {
        mValue = static_cast<WGPUOptionalBool>(value);
        return *this;
      }
      OptionalBool& operator=(const std::optional<bool>& value) {
        mValue = value ? static_cast<WGPUOptionalBool>(*value)
                       : WGPUOptionalBool_Undefined;
        return *this;
      }
      OptionalBool& operator=(const WGPUOptionalBool& value) {
        mValue = value;
        return *this;
      }

      operator WGPUOptionalBool() const { return mValue; }
      operator std::optional<bool>() const {
        if (mValue == WGPUOptionalBool_Undefined) {
          return std::nullopt;
        }
        return static_cast<bool>(mValue);
      }

      friend bool operator==(const OptionalBool& lhs, const OptionalBool& rhs) {
        return lhs.mValue == rhs.mValue;
      }
      friend bool operator!=(const OptionalBool& lhs, const OptionalBool& rhs) {
        return lhs.mValue != rhs.mValue;
      }

     private:
      friend struct std::hash<OptionalBool>;
      WGPUOptionalBool mValue = WGPUOptionalBool_Undefined;
    };
    inline const OptionalBool OptionalBool::False =
        OptionalBool(WGPUOptionalBool_False);
    inline const OptionalBool OptionalBool::True =
        OptionalBool(WGPUOptionalBool_True);
    inline const OptionalBool OptionalBool::Undefined =
        OptionalBool(WGPUOptionalBool_Undefined);

    struct ConvertibleStatus {
      constexpr ConvertibleStatus(Status status) : status(status) {}
      constexpr operator bool() const { return status == Status::Success; }
      constexpr operator Status() const { return status; }
      Status status;
    };

    template <typename Derived, typename CType>
    class ObjectBase {
     public:
      ObjectBase() = default;
      ObjectBase(CType handle) : mHandle(handle) {
        if (mHandle)
          Derived::WGPUAddRef(mHandle);
      }
      ~ObjectBase() {
        if (mHandle)
          Derived::WGPURelease(mHandle);
      }

      ObjectBase(ObjectBase const& other) : ObjectBase(other.Get()) {}
      Derived& operator=(ObjectBase const& other) {
        if (&other != this) {
          if (mHandle)
            Derived::WGPURelease(mHandle);
          mHandle = other.mHandle;
          if (mHandle)
            Derived::WGPUAddRef(mHandle);
        }
        return static_cast<Derived&>(*this);
      }

      ObjectBase(ObjectBase&& other) {
        mHandle = other.mHandle;
        other.mHandle = 0;
      }
      Derived& operator=(ObjectBase&& other) {
        if (&other != this) {
          if (mHandle)
            Derived::WGPURelease(mHandle);
          mHandle = other.mHandle;
          other.mHandle = 0;
        }
        return static_cast<Derived&>(*this);
      }

      ObjectBase(std::nullptr_t) {}
      Derived& operator=(std::nullptr_t) {
        if (mHandle != nullptr) {
          Derived::WGPURelease(mHandle);
          mHandle = nullptr;
        }
        return static_cast<Derived&>(*this);
      }

      bool operator==(std::nullptr_t) const { return mHandle == nullptr; }
      bool operator!=(std::nullptr_t) const { return mHandle != nullptr; }

      explicit operator bool() const { return mHandle != nullptr; }
      CType Get() const { return mHandle; }
      CType MoveToCHandle() {
        CType result = mHandle;
        mHandle = 0;
        return result;
      }
      static Derived Acquire(CType handle) {
        Derived result;
        result.mHandle = handle;
        return result;
      }

     protected:
      CType mHandle = nullptr;
    };
"#);

/// `StringView` and the `detail` helpers the generated structs lean on.
pub const UTILITY: &str = indoc!(r#"
    namespace detail {
    struct StringViewAdapter;
    }  // namespace detail

    struct StringView {
      char const* data = nullptr;
      size_t length = WGPU_STRLEN;

      inline constexpr StringView() noexcept = default;

      inline constexpr StringView(const std::string_view& sv) noexcept {
        this->data = sv.data();
        this->length = sv.length();
      }

      inline constexpr StringView(const char* s) {
        this->data = s;
        this->length = WGPU_STRLEN;
      }

      inline constexpr StringView(WGPUStringView s) {
        this->data = s.data;
        this->length = s.length;
      }

      inline constexpr StringView(const char* data, size_t length) {
        this->data = data;
        this->length = length;
      }

      inline constexpr StringView(std::nullptr_t) {
        this->data = nullptr;
        this->length = WGPU_STRLEN;
      }

      inline constexpr StringView(std::nullopt_t) {
        this->data = nullptr;
        this->length = WGPU_STRLEN;
      }

      bool IsUndefined() const {
        return this->data == nullptr && this->length == WGPU_STRLEN;
      }

      operator std::string_view() const {
        if (this->length == WGPU_STRLEN) {
          if (IsUndefined()) {
            return {};
          }
          return {this->data};
        }
        return {this->data, this->length};
      }

      template <typename View,
                typename = std::enable_if_t<
                    std::is_constructible_v<View, const char*, size_t>>>
      explicit operator View() const {
        if (this->length == WGPU_STRLEN) {
          if (IsUndefined()) {
            return {};
          }
          return {this->data};
        }
        return {this->data, this->length};
      }

      StringView(const detail::StringViewAdapter& s);
    };

    namespace detail {
    constexpr size_t ConstexprMax(size_t a, size_t b) {
      return a > b ? a : b;
    }

    template <typename T>
    static T& AsNonConstReference(const T& value) {
      return const_cast<T&>(value);
    }

    struct StringViewAdapter {
      WGPUStringView sv;
      char* nullTerminated = nullptr;

      StringViewAdapter(WGPUStringView sv) : sv(sv) {}
      ~StringViewAdapter() { delete[] nullTerminated; }
      operator ::WGPUStringView() { return sv; }
      operator StringView() { return {sv.data, sv.length}; }
      operator const char*() {
        assert(sv.length != WGPU_STRLEN);
        assert(nullTerminated == nullptr);
        nullTerminated = new char[sv.length + 1];
        for (size_t i = 0; i < sv.length; i++) {
          nullTerminated[i] = sv.data[i];
        }
        nullTerminated[sv.length] = 0;
        return nullTerminated;
      }
    };
    }  // namespace detail

    inline StringView::StringView(const detail::StringViewAdapter& s)
        : data(s.sv.data), length(s.sv.length) {}

    namespace detail {
    template <typename... Args>
    struct CallbackTypeBase;
    template <typename... Args>
    struct CallbackTypeBase<std::tuple<Args...>> {
      using Callback = std::function<void(Args...)>;
    };
    template <typename... Args>
    struct CallbackTypeBase<std::tuple<Args...>, void> {
      using Callback = void(Args...);
    };
    template <typename... Args, typename T>
    struct CallbackTypeBase<std::tuple<Args...>, T> {
      using Callback = void(Args..., T);
    };
    }  // namespace detail
"#);

/// Base of every struct whose first C member is a `WGPUChainedStruct`.
pub const CHAINED_STRUCT: &str = indoc!(r#"
    struct ChainedStruct {
      ChainedStruct const* nextInChain = nullptr;
      SType sType = SType(0u);
    };
    static_assert(sizeof(ChainedStruct) == sizeof(WGPUChainedStruct),
                  "sizeof mismatch for ChainedStruct");
    static_assert(alignof(ChainedStruct) == alignof(WGPUChainedStruct),
                  "alignof mismatch for ChainedStruct");
    static_assert(offsetof(ChainedStruct, nextInChain) ==
                      offsetof(WGPUChainedStruct, next),
                  "offsetof mismatch for ChainedStruct::nextInChain");
    static_assert(offsetof(ChainedStruct, sType) ==
                      offsetof(WGPUChainedStruct, sType),
                  "offsetof mismatch for ChainedStruct::sType");
"#);
